use sea_orm_migration::prelude::*;

mod m20260301_000001_create_users;
mod m20260301_000002_create_media;
mod m20260301_000003_create_related_media;
mod m20260301_000004_create_list_entries;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_users::Migration),
            Box::new(m20260301_000002_create_media::Migration),
            Box::new(m20260301_000003_create_related_media::Migration),
            Box::new(m20260301_000004_create_list_entries::Migration),
        ]
    }
}
