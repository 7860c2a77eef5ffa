use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Project: list ordering + client filter
        manager
            .create_index(
                Index::create()
                    .name("idx_project_client")
                    .table(Project::Table)
                    .col(Project::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_website_client")
                    .table(Website::Table)
                    .col(Website::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_video_client")
                    .table(Video::Table)
                    .col(Video::ClientId)
                    .to_owned(),
            )
            .await?;

        // Mapping: one row per (website, technology)
        manager
            .create_index(
                Index::create()
                    .name("uniq_wtm_website_technology")
                    .table(WebsiteTechnologyMapping::Table)
                    .col(WebsiteTechnologyMapping::WebsiteId)
                    .col(WebsiteTechnologyMapping::TechnologyId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Tags: lookups by owner
        manager
            .create_index(
                Index::create()
                    .name("idx_tag_mapping_entity")
                    .table(TagMapping::Table)
                    .col(TagMapping::EntityType)
                    .col(TagMapping::EntityId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_index(Index::drop().name("idx_tag_mapping_entity").table(TagMapping::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("uniq_wtm_website_technology").table(WebsiteTechnologyMapping::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_video_client").table(Video::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_website_client").table(Website::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_project_client").table(Project::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Project { Table, ClientId }

#[derive(DeriveIden)]
enum Website { Table, ClientId }

#[derive(DeriveIden)]
enum Video { Table, ClientId }

#[derive(DeriveIden)]
enum WebsiteTechnologyMapping { Table, WebsiteId, TechnologyId }

#[derive(DeriveIden)]
enum TagMapping { Table, EntityType, EntityId }
