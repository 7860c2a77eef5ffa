//! Create `project` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Project::Table)
                    .if_not_exists()
                    .col(big_integer(Project::Id).primary_key())
                    .col(integer_null(Project::ClientId))
                    .col(string_len(Project::ProjectName, 255))
                    .col(text_null(Project::Description))
                    .col(text_null(Project::Description1))
                    .col(integer(Project::Priority).default(0))
                    .col(timestamp_with_time_zone_null(Project::StartDate))
                    .col(timestamp_with_time_zone(Project::CreatedAt))
                    .col(timestamp_with_time_zone(Project::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_client")
                            .from(Project::Table, Project::ClientId)
                            .to(Client::Table, Client::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Project::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Project {
    Table,
    Id,
    ClientId,
    ProjectName,
    Description,
    Description1,
    Priority,
    StartDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Client { Table, Id }
