//! Create `project_scope` table.
//! Scopes belong to a project and are replaced wholesale on every sync.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProjectScope::Table)
                    .if_not_exists()
                    .col(pk_auto(ProjectScope::Id))
                    .col(big_integer(ProjectScope::ProjectId))
                    .col(string_len(ProjectScope::ScopeType, 32))
                    .col(boolean(ProjectScope::IsSelected).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_scope_project")
                            .from(ProjectScope::Table, ProjectScope::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ProjectScope::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ProjectScope {
    Table,
    Id,
    ProjectId,
    ScopeType,
    IsSelected,
}

#[derive(DeriveIden)]
enum Project { Table, Id }
