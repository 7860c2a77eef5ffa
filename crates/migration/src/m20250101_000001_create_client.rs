//! Create `client` table.
//! Ids are assigned upstream and arrive through the sync endpoint.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Client::Table)
                    .if_not_exists()
                    .col(integer(Client::Id).primary_key())
                    .col(string_len_null(Client::ClientName, 255))
                    .col(integer_null(Client::CountryId))
                    .col(text_null(Client::Description))
                    .col(text_null(Client::Description1))
                    .col(string_len_null(Client::Thumbnail, 512))
                    .col(integer(Client::Priority).default(0))
                    .col(timestamp_with_time_zone(Client::CreatedAt))
                    .col(timestamp_with_time_zone(Client::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Client::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Client {
    Table,
    Id,
    ClientName,
    CountryId,
    Description,
    Description1,
    Thumbnail,
    Priority,
    CreatedAt,
    UpdatedAt,
}
