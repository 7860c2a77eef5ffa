use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::enums::CreativeType;

/// Marketing collateral. `file` and `thumbnail` hold storage keys.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "creative")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub priority: i32,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub kind: CreativeType,
    pub file: Option<String>,
    pub thumbnail: Option<String>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
