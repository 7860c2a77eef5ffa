//! Create `creative` table.
//! Holds up to two storage keys: the document (`file`) and its preview image.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Creative::Table)
                    .if_not_exists()
                    .col(pk_auto(Creative::Id))
                    .col(string_len(Creative::Name, 255))
                    .col(text_null(Creative::Description))
                    .col(integer(Creative::Priority).default(0))
                    .col(string_len(Creative::Type, 16))
                    .col(string_len_null(Creative::File, 512))
                    .col(string_len_null(Creative::Thumbnail, 512))
                    .col(integer_null(Creative::CreatedBy))
                    .col(integer_null(Creative::UpdatedBy))
                    .col(timestamp_with_time_zone(Creative::CreatedAt))
                    .col(timestamp_with_time_zone(Creative::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Creative::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Creative {
    Table,
    Id,
    Name,
    Description,
    Priority,
    Type,
    File,
    Thumbnail,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}
