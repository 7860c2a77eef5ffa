use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{client, project_scope};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project")]
pub struct Model {
    /// 64-bit upstream id; rendered as a JSON string so JS clients keep every digit.
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(with = "id_string")]
    pub id: i64,
    pub client_id: Option<i32>,
    pub project_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description1: Option<String>,
    pub priority: i32,
    pub start_date: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Client,
    Scope,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Client => Entity::belongs_to(client::Entity)
                .from(Column::ClientId)
                .to(client::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
            Relation::Scope => Entity::has_many(project_scope::Entity).into(),
        }
    }
}

impl Related<client::Entity> for Entity {
    fn to() -> RelationDef { Relation::Client.def() }
}

impl Related<project_scope::Entity> for Entity {
    fn to() -> RelationDef { Relation::Scope.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub mod id_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &i64, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(i64),
            Str(String),
        }
        match Raw::deserialize(d)? {
            Raw::Num(n) => Ok(n),
            Raw::Str(s) => s.trim().parse().map_err(de::Error::custom),
        }
    }
}
