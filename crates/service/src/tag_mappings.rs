use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::info;

use models::enums::TagEntityType;
use models::validation::require_non_blank;
use models::{tag_mapping, video, website};

use crate::errors::ServiceError;
use crate::serde_ext::{opt_i32, req_i32};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTagInput {
    pub entity_type: TagEntityType,
    #[serde(deserialize_with = "req_i32")]
    pub entity_id: i32,
    pub tag_name: String,
    #[serde(default, deserialize_with = "opt_i32")]
    pub created_by: Option<i32>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub updated_by: Option<i32>,
}

/// Attach a tag. Website and video targets must exist and get their FK set;
/// creatives are referenced by `entity_id` alone.
pub async fn create_tag(db: &DatabaseConnection, input: CreateTagInput) -> Result<tag_mapping::Model, ServiceError> {
    let tag_name = require_non_blank("tag_name", &input.tag_name)?;
    let dup = tag_mapping::Entity::find()
        .filter(tag_mapping::Column::EntityType.eq(input.entity_type))
        .filter(tag_mapping::Column::EntityId.eq(input.entity_id))
        .filter(tag_mapping::Column::TagName.eq(tag_name.as_str()))
        .count(db)
        .await?;
    if dup > 0 {
        return Err(ServiceError::BadRequest(format!("Tag with name '{tag_name}' already exists for this entity")));
    }

    let (website_id, video_id) = match input.entity_type {
        TagEntityType::Website => {
            if website::Entity::find_by_id(input.entity_id).one(db).await?.is_none() {
                return Err(ServiceError::not_found("Website", input.entity_id));
            }
            (Some(input.entity_id), None)
        }
        TagEntityType::Video => {
            if video::Entity::find_by_id(input.entity_id).one(db).await?.is_none() {
                return Err(ServiceError::not_found("Video", input.entity_id));
            }
            (None, Some(input.entity_id))
        }
        TagEntityType::Creative => (None, None),
    };

    let m = tag_mapping::ActiveModel {
        entity_type: Set(input.entity_type),
        entity_id: Set(input.entity_id),
        tag_name: Set(tag_name),
        website_id: Set(website_id),
        video_id: Set(video_id),
        created_by: Set(input.created_by),
        updated_by: Set(input.updated_by),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!(id = m.id, entity_id = m.entity_id, tag = %m.tag_name, "created tag mapping");
    Ok(m)
}

/// Tags of one entity, newest first.
pub async fn tags_for(db: &DatabaseConnection, entity_type: TagEntityType, entity_id: i32) -> Result<Vec<tag_mapping::Model>, ServiceError> {
    let tags = tag_mapping::Entity::find()
        .filter(tag_mapping::Column::EntityType.eq(entity_type))
        .filter(tag_mapping::Column::EntityId.eq(entity_id))
        .order_by_desc(tag_mapping::Column::Id)
        .all(db)
        .await?;
    Ok(tags)
}

pub async fn delete_tag(db: &DatabaseConnection, id: i32) -> Result<tag_mapping::Model, ServiceError> {
    let existing = tag_mapping::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Tag mapping", id))?;
    tag_mapping::Entity::delete_by_id(id).exec(db).await?;
    info!(id, "deleted tag mapping");
    Ok(existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serde_ext::decode;
    use crate::storage::LocalDiskStore;
    use crate::test_support::{get_db, seed_client};
    use crate::websites::{create_website, delete_website};
    use serde_json::json;

    fn tag(entity_type: &str, id: i32, name: &str) -> CreateTagInput {
        decode(json!({"entity_type": entity_type, "entity_id": id, "tag_name": name})).unwrap()
    }

    #[tokio::test]
    async fn website_tags_lifecycle() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let st = LocalDiskStore::new(std::env::temp_dir(), "");
        seed_client(&db, 1, "Acme").await?;
        let w = create_website(&db, &st, decode(json!({"client_id": 1, "title": "Shop", "url": "https://s", "type": "WEBSITE"}))?, None).await?;

        let first = create_tag(&db, tag("WEBSITE", w.id, "retail")).await?;
        assert_eq!(first.website_id, Some(w.id));
        let second = create_tag(&db, tag("WEBSITE", w.id, "b2c")).await?;

        let err = create_tag(&db, tag("WEBSITE", w.id, "retail")).await.unwrap_err();
        assert_eq!(err.to_string(), "Tag with name 'retail' already exists for this entity");
        assert!(matches!(err, ServiceError::BadRequest(_)));

        let tags = tags_for(&db, TagEntityType::Website, w.id).await?;
        assert_eq!(tags.iter().map(|t| t.id).collect::<Vec<_>>(), vec![second.id, first.id]);

        delete_tag(&db, first.id).await?;
        assert!(matches!(delete_tag(&db, first.id).await, Err(ServiceError::NotFound(_))));

        delete_website(&db, &st, w.id).await?;
        assert!(tags_for(&db, TagEntityType::Website, w.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn targets_must_exist_except_creatives() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        assert!(matches!(create_tag(&db, tag("VIDEO", 5, "x")).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(create_tag(&db, tag("WEBSITE", 5, "x")).await, Err(ServiceError::NotFound(_))));
        let c = create_tag(&db, tag("CREATIVE", 5, "x")).await?;
        assert_eq!((c.website_id, c.video_id), (None, None));
        assert!(decode::<CreateTagInput>(json!({"entity_type": "CLIENT", "entity_id": 1, "tag_name": "x"})).is_err());
        Ok(())
    }
}
