//! Create `website_technology_mapping` join table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WebsiteTechnologyMapping::Table)
                    .if_not_exists()
                    .col(pk_auto(WebsiteTechnologyMapping::Id))
                    .col(integer(WebsiteTechnologyMapping::WebsiteId))
                    .col(integer(WebsiteTechnologyMapping::TechnologyId))
                    .col(integer_null(WebsiteTechnologyMapping::CreatedBy))
                    .col(integer_null(WebsiteTechnologyMapping::UpdatedBy))
                    .col(timestamp_with_time_zone(WebsiteTechnologyMapping::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wtm_website")
                            .from(WebsiteTechnologyMapping::Table, WebsiteTechnologyMapping::WebsiteId)
                            .to(Website::Table, Website::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wtm_technology")
                            .from(WebsiteTechnologyMapping::Table, WebsiteTechnologyMapping::TechnologyId)
                            .to(Technology::Table, Technology::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(WebsiteTechnologyMapping::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum WebsiteTechnologyMapping {
    Table,
    Id,
    WebsiteId,
    TechnologyId,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Website { Table, Id }

#[derive(DeriveIden)]
enum Technology { Table, Id }
