use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::enums::TagEntityType;
use crate::errors::ModelError;
use crate::{video, website};

/// A free-text tag attached to a website, video or creative.
///
/// `entity_type` + `entity_id` identify the owner. `website_id`/`video_id`
/// duplicate that reference as real foreign keys so tags are removed together
/// with their website or video; creatives have no such column.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tag_mapping")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub entity_type: TagEntityType,
    pub entity_id: i32,
    pub tag_name: String,
    pub website_id: Option<i32>,
    pub video_id: Option<i32>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Website,
    Video,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Website => Entity::belongs_to(website::Entity)
                .from(Column::WebsiteId)
                .to(website::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::Video => Entity::belongs_to(video::Entity)
                .from(Column::VideoId)
                .to(video::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<website::Entity> for Entity {
    fn to() -> RelationDef { Relation::Website.def() }
}

impl Related<video::Entity> for Entity {
    fn to() -> RelationDef { Relation::Video.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Ids of entities of `entity_type` carrying a tag whose name contains `keyword`
/// (case-insensitive).
pub async fn entity_ids_tagged(
    db: &DatabaseConnection,
    entity_type: TagEntityType,
    keyword: &str,
) -> Result<Vec<i32>, ModelError> {
    use sea_orm::sea_query::{Expr, Func};
    use sea_orm::QuerySelect;

    let ids: Vec<i32> = Entity::find()
        .select_only()
        .column(Column::EntityId)
        .filter(Column::EntityType.eq(entity_type))
        .filter(Expr::expr(Func::lower(Expr::col((Entity, Column::TagName)))).like(crate::search::contains_pattern(keyword)))
        .distinct()
        .into_tuple()
        .all(db)
        .await?;
    Ok(ids)
}
