use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Media::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Media::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Media::MediaType).string_len(16).not_null())
                    .col(ColumnDef::new(Media::Title).string_len(250).not_null())
                    .col(ColumnDef::new(Media::LocalTitle).string_len(250).null())
                    .col(ColumnDef::new(Media::Description).text().null())
                    .col(ColumnDef::new(Media::Score).double().not_null().default(0.0))
                    .col(ColumnDef::new(Media::Members).integer().not_null().default(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_media_media_type")
                    .table(Media::Table)
                    .col(Media::MediaType)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Films::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Films::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Films::MediaId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Films::Runtime).integer().null())
                    .col(ColumnDef::new(Films::Rating).string_len(3).null())
                    .col(ColumnDef::new(Films::ReleaseStatus).string_len(32).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_films_media_id")
                            .from(Films::Table, Films::MediaId)
                            .to(Media::Table, Media::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Series::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Series::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Series::MediaId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Series::Episodes).integer().null())
                    .col(ColumnDef::new(Series::Rating).string_len(3).null())
                    .col(ColumnDef::new(Series::AiringStatus).string_len(32).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_series_media_id")
                            .from(Series::Table, Series::MediaId)
                            .to(Media::Table, Media::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Books::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Books::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Books::MediaId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Books::Chapters).integer().null())
                    .col(ColumnDef::new(Books::ReleaseStatus).string_len(32).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_books_media_id")
                            .from(Books::Table, Books::MediaId)
                            .to(Media::Table, Media::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Books::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Series::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Films::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Media::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Media {
    Table,
    Id,
    MediaType,
    Title,
    LocalTitle,
    Description,
    Score,
    Members,
}

#[derive(DeriveIden)]
enum Films {
    Table,
    Id,
    MediaId,
    Runtime,
    Rating,
    ReleaseStatus,
}

#[derive(DeriveIden)]
enum Series {
    Table,
    Id,
    MediaId,
    Episodes,
    Rating,
    AiringStatus,
}

#[derive(DeriveIden)]
enum Books {
    Table,
    Id,
    MediaId,
    Chapters,
    ReleaseStatus,
}
