use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::enums::WebsiteType;
use crate::{client, tag_mapping, website_technology_mapping};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "website")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub client_id: i32,
    pub title: String,
    pub url: String,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub kind: WebsiteType,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Storage key, not a URL.
    pub thumbnail: Option<String>,
    pub launch_date: Option<DateTimeWithTimeZone>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Client,
    TechnologyMapping,
    Tag,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Client => Entity::belongs_to(client::Entity)
                .from(Column::ClientId)
                .to(client::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::TechnologyMapping => Entity::has_many(website_technology_mapping::Entity).into(),
            Relation::Tag => Entity::has_many(tag_mapping::Entity).into(),
        }
    }
}

impl Related<client::Entity> for Entity {
    fn to() -> RelationDef { Relation::Client.def() }
}

impl Related<website_technology_mapping::Entity> for Entity {
    fn to() -> RelationDef { Relation::TechnologyMapping.def() }
}

impl Related<tag_mapping::Entity> for Entity {
    fn to() -> RelationDef { Relation::Tag.def() }
}

impl ActiveModelBehavior for ActiveModel {}
