//! Create `tag_mapping` table.
//! `entity_type` + `entity_id` is the soft reference used for filtering; the
//! nullable website/video FKs only exist so tags vanish with their owner.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TagMapping::Table)
                    .if_not_exists()
                    .col(pk_auto(TagMapping::Id))
                    .col(string_len(TagMapping::EntityType, 16))
                    .col(integer(TagMapping::EntityId))
                    .col(string_len(TagMapping::TagName, 128))
                    .col(integer_null(TagMapping::WebsiteId))
                    .col(integer_null(TagMapping::VideoId))
                    .col(integer_null(TagMapping::CreatedBy))
                    .col(integer_null(TagMapping::UpdatedBy))
                    .col(timestamp_with_time_zone(TagMapping::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tag_mapping_website")
                            .from(TagMapping::Table, TagMapping::WebsiteId)
                            .to(Website::Table, Website::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tag_mapping_video")
                            .from(TagMapping::Table, TagMapping::VideoId)
                            .to(Video::Table, Video::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(TagMapping::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum TagMapping {
    Table,
    Id,
    EntityType,
    EntityId,
    TagName,
    WebsiteId,
    VideoId,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Website { Table, Id }

#[derive(DeriveIden)]
enum Video { Table, Id }
