//! Create `website` table.
//! `thumbnail` holds a storage key, never a URL.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Website::Table)
                    .if_not_exists()
                    .col(pk_auto(Website::Id))
                    .col(integer(Website::ClientId))
                    .col(string_len(Website::Title, 255))
                    .col(string_len(Website::Url, 1024))
                    .col(string_len(Website::Type, 32))
                    .col(text_null(Website::Description))
                    .col(string_len_null(Website::Thumbnail, 512))
                    .col(timestamp_with_time_zone_null(Website::LaunchDate))
                    .col(integer_null(Website::CreatedBy))
                    .col(integer_null(Website::UpdatedBy))
                    .col(timestamp_with_time_zone(Website::CreatedAt))
                    .col(timestamp_with_time_zone(Website::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_website_client")
                            .from(Website::Table, Website::ClientId)
                            .to(Client::Table, Client::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Website::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Website {
    Table,
    Id,
    ClientId,
    Title,
    Url,
    Type,
    Description,
    Thumbnail,
    LaunchDate,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Client { Table, Id }
