//! Trimmed projections of related rows embedded in list responses.

use serde::Serialize;

use models::enums::TagEntityType;
use models::{client, tag_mapping, technology, website};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClientRef {
    pub id: i32,
    pub client_name: Option<String>,
}

impl From<client::Model> for ClientRef {
    fn from(c: client::Model) -> Self { Self { id: c.id, client_name: c.client_name } }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TagRef {
    pub id: i32,
    pub tag_name: String,
    pub entity_type: TagEntityType,
}

impl From<tag_mapping::Model> for TagRef {
    fn from(t: tag_mapping::Model) -> Self { Self { id: t.id, tag_name: t.tag_name, entity_type: t.entity_type } }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TechnologyRef {
    pub id: i32,
    pub name: String,
}

impl From<technology::Model> for TechnologyRef {
    fn from(t: technology::Model) -> Self { Self { id: t.id, name: t.name } }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WebsiteRef {
    pub id: i32,
    pub title: String,
}

impl From<website::Model> for WebsiteRef {
    fn from(w: website::Model) -> Self { Self { id: w.id, title: w.title } }
}

/// `{id}` stand-in for the user columns; there is no user table to join.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct UserRef {
    pub id: i32,
}

impl UserRef {
    pub fn from_id(id: Option<i32>) -> Option<Self> { id.map(|id| Self { id }) }
}
