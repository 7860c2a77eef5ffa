use sea_orm::{entity::prelude::*, DatabaseConnection};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{project, video, website};

/// Ids are assigned by the upstream system that `sync` mirrors from.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "client")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub client_name: Option<String>,
    pub country_id: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description1: Option<String>,
    pub thumbnail: Option<String>,
    pub priority: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Project,
    Website,
    Video,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Project => Entity::has_many(project::Entity).into(),
            Relation::Website => Entity::has_many(website::Entity).into(),
            Relation::Video => Entity::has_many(video::Entity).into(),
        }
    }
}

impl Related<project::Entity> for Entity {
    fn to() -> RelationDef { Relation::Project.def() }
}

impl Related<website::Entity> for Entity {
    fn to() -> RelationDef { Relation::Website.def() }
}

impl Related<video::Entity> for Entity {
    fn to() -> RelationDef { Relation::Video.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn exists(db: &DatabaseConnection, id: i32) -> Result<bool, ModelError> {
    let n = Entity::find_by_id(id).count(db).await?;
    Ok(n > 0)
}
