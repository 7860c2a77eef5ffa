use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Technology::Table)
                    .if_not_exists()
                    .col(pk_auto(Technology::Id))
                    .col(string_len(Technology::Name, 128).unique_key())
                    .col(integer_null(Technology::CreatedBy))
                    .col(integer_null(Technology::UpdatedBy))
                    .col(timestamp_with_time_zone(Technology::CreatedAt))
                    .col(timestamp_with_time_zone(Technology::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Technology::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Technology {
    Table,
    Id,
    Name,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}
