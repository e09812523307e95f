use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RelatedMedia::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RelatedMedia::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RelatedMedia::Media1Id).integer().not_null())
                    .col(ColumnDef::new(RelatedMedia::Media2Id).integer().not_null())
                    .col(
                        ColumnDef::new(RelatedMedia::Relationship)
                            .string_len(16)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_related_media_media1_id")
                            .from(RelatedMedia::Table, RelatedMedia::Media1Id)
                            .to(Media::Table, Media::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_related_media_media2_id")
                            .from(RelatedMedia::Table, RelatedMedia::Media2Id)
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
                    .name("idx_related_media_pair")
                    .table(RelatedMedia::Table)
                    .col(RelatedMedia::Media1Id)
                    .col(RelatedMedia::Media2Id)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_related_media_media2")
                    .table(RelatedMedia::Table)
                    .col(RelatedMedia::Media2Id)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // One edge per unordered pair, whichever way round it was stored.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_related_media_unordered_pair \
                 ON related_media(MIN(media1_id, media2_id), MAX(media1_id, media2_id))",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS idx_related_media_unordered_pair")
            .await?;

        manager
            .drop_table(Table::drop().table(RelatedMedia::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Media {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum RelatedMedia {
    Table,
    Id,
    #[sea_orm(iden = "media1_id")]
    Media1Id,
    #[sea_orm(iden = "media2_id")]
    Media2Id,
    Relationship,
}
