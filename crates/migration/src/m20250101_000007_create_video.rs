use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Video::Table)
                    .if_not_exists()
                    .col(pk_auto(Video::Id))
                    .col(integer(Video::ClientId))
                    .col(string_len(Video::Title, 255))
                    .col(text_null(Video::Description))
                    .col(string_len(Video::VideoUrl, 1024))
                    .col(string_len_null(Video::Thumbnail, 512))
                    .col(string_len(Video::Format, 16))
                    .col(string_len(Video::Type, 32))
                    .col(integer_null(Video::CreatedBy))
                    .col(integer_null(Video::UpdatedBy))
                    .col(timestamp_with_time_zone(Video::CreatedAt))
                    .col(timestamp_with_time_zone(Video::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_video_client")
                            .from(Video::Table, Video::ClientId)
                            .to(Client::Table, Client::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Video::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Video {
    Table,
    Id,
    ClientId,
    Title,
    Description,
    VideoUrl,
    Thumbnail,
    Format,
    Type,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Client { Table, Id }
