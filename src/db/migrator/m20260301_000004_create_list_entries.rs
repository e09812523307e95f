use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ListEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ListEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ListEntries::UserId).integer().not_null())
                    .col(ColumnDef::new(ListEntries::MediaId).integer().not_null())
                    .col(ColumnDef::new(ListEntries::Score).double().null())
                    .col(
                        ColumnDef::new(ListEntries::Progress)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_list_entries_user_id")
                            .from(ListEntries::Table, ListEntries::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_list_entries_media_id")
                            .from(ListEntries::Table, ListEntries::MediaId)
                            .to(Media::Table, Media::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_list_entries_user_media")
                    .table(ListEntries::Table)
                    .col(ListEntries::UserId)
                    .col(ListEntries::MediaId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ListEntries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Media {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ListEntries {
    Table,
    Id,
    UserId,
    MediaId,
    Score,
    Progress,
}
