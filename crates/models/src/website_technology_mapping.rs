use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{technology, website};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "website_technology_mapping")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub website_id: i32,
    pub technology_id: i32,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Website,
    Technology,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Website => Entity::belongs_to(website::Entity)
                .from(Column::WebsiteId)
                .to(website::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::Technology => Entity::belongs_to(technology::Entity)
                .from(Column::TechnologyId)
                .to(technology::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<website::Entity> for Entity {
    fn to() -> RelationDef { Relation::Website.def() }
}

impl Related<technology::Entity> for Entity {
    fn to() -> RelationDef { Relation::Technology.def() }
}

impl ActiveModelBehavior for ActiveModel {}
