use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::validation::require_non_blank;
use models::{technology, website, website_technology_mapping as wtm};

use crate::errors::ServiceError;
use crate::listing::keyword_condition;
use crate::pagination::{Page, Pagination};
use crate::serde_ext::opt_i32;
use crate::views::WebsiteRef;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTechnologyInput {
    pub name: String,
    #[serde(default, deserialize_with = "opt_i32")]
    pub created_by: Option<i32>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub updated_by: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTechnologyInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub created_by: Option<i32>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub updated_by: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TechnologyWebsiteView {
    pub id: i32,
    pub website_id: i32,
    pub technology_id: i32,
    pub created_at: DateTime<FixedOffset>,
    pub website: Option<WebsiteRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TechnologyView {
    #[serde(flatten)]
    pub technology: technology::Model,
    pub websites: Vec<TechnologyWebsiteView>,
}

fn duplicate(name: &str) -> ServiceError {
    ServiceError::Conflict(format!("Technology with name '{name}' already exists"))
}

pub async fn create_technology(db: &DatabaseConnection, input: CreateTechnologyInput) -> Result<technology::Model, ServiceError> {
    let name = require_non_blank("name", &input.name)?;
    if technology::find_by_name(db, &name).await?.is_some() {
        return Err(duplicate(&name));
    }
    let now = Utc::now().into();
    let m = technology::ActiveModel {
        name: Set(name),
        created_by: Set(input.created_by),
        updated_by: Set(input.updated_by),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!(id = m.id, name = %m.name, "created technology");
    Ok(m)
}

pub async fn list_technologies(
    db: &DatabaseConnection,
    page: Pagination,
    keyword: Option<&str>,
) -> Result<Page<TechnologyView>, ServiceError> {
    let mut q = technology::Entity::find();
    if let Some(cond) = keyword_condition(&[technology::Column::Name], keyword) {
        q = q.filter(cond);
    }
    let paginator = q.order_by_desc(technology::Column::Id).paginate(db, page.limit);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(page.page_index()).await?;
    let mappings = rows.load_many(wtm::Entity, db).await?;

    let site_ids: Vec<i32> = mappings.iter().flatten().map(|m| m.website_id).collect();
    let sites: HashMap<i32, website::Model> = if site_ids.is_empty() {
        HashMap::new()
    } else {
        website::Entity::find()
            .filter(website::Column::Id.is_in(site_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|w| (w.id, w))
            .collect()
    };

    let items = rows
        .into_iter()
        .zip(mappings)
        .map(|(technology, maps)| TechnologyView {
            technology,
            websites: maps
                .into_iter()
                .map(|m| TechnologyWebsiteView {
                    website: sites.get(&m.website_id).cloned().map(WebsiteRef::from),
                    id: m.id,
                    website_id: m.website_id,
                    technology_id: m.technology_id,
                    created_at: m.created_at,
                })
                .collect(),
        })
        .collect();
    Ok(Page::new(items, total, page))
}

pub async fn update_technology(db: &DatabaseConnection, id: i32, input: UpdateTechnologyInput) -> Result<technology::Model, ServiceError> {
    let existing = technology::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Technology", id))?;
    let mut am: technology::ActiveModel = existing.clone().into();
    if let Some(n) = input.name {
        let name = require_non_blank("name", &n)?;
        if name != existing.name {
            let clash = technology::Entity::find()
                .filter(technology::Column::Name.eq(name.as_str()))
                .filter(technology::Column::Id.ne(id))
                .count(db)
                .await?;
            if clash > 0 {
                return Err(duplicate(&name));
            }
        }
        am.name = Set(name);
    }
    if let Some(by) = input.created_by {
        am.created_by = Set(Some(by));
    }
    if let Some(by) = input.updated_by {
        am.updated_by = Set(Some(by));
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Website mappings go with it through the FK cascade.
pub async fn delete_technology(db: &DatabaseConnection, id: i32) -> Result<technology::Model, ServiceError> {
    let existing = technology::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Technology", id))?;
    technology::Entity::delete_by_id(id).exec(db).await?;
    info!(id, "deleted technology");
    Ok(existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serde_ext::decode;
    use crate::test_support::get_db;
    use serde_json::json;

    fn named(name: &str) -> CreateTechnologyInput {
        CreateTechnologyInput { name: name.into(), created_by: None, updated_by: None }
    }

    #[tokio::test]
    async fn duplicate_names_conflict() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let rust = create_technology(&db, named("Rust")).await?;
        let go = create_technology(&db, named("Go")).await?;
        let err = create_technology(&db, named("Rust")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(err.to_string(), "Technology with name 'Rust' already exists");

        let err = update_technology(&db, go.id, decode(json!({"name": "Rust"}))?).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        // renaming to its own name is fine
        let same = update_technology(&db, rust.id, decode(json!({"name": "Rust", "updated_by": "4"}))?).await?;
        assert_eq!(same.updated_by, Some(4));
        assert!(matches!(
            update_technology(&db, 999, UpdateTechnologyInput::default()).await,
            Err(ServiceError::NotFound(_))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn list_embeds_websites_and_delete_cascades() -> Result<(), anyhow::Error> {
        use crate::storage::LocalDiskStore;
        use crate::test_support::seed_client;
        use crate::websites::{create_website, set_technology_mappings};

        let db = get_db().await?;
        let st = LocalDiskStore::new(std::env::temp_dir(), "");
        seed_client(&db, 1, "Acme").await?;
        let w = create_website(&db, &st, decode(json!({"client_id": 1, "title": "Shop", "url": "https://s", "type": "WEBSITE"}))?, None).await?;
        let t = create_technology(&db, named("Svelte")).await?;
        create_technology(&db, named("Solid")).await?;
        set_technology_mappings(&db, w.id, decode(json!({"technology_ids": [t.id]}))?).await?;

        let page = list_technologies(&db, Pagination::default(), Some("s")).await?;
        assert_eq!(page.total, 2);
        let svelte = page.items.iter().find(|v| v.technology.id == t.id).unwrap();
        assert_eq!(svelte.websites[0].website.as_ref().unwrap().title, "Shop");

        delete_technology(&db, t.id).await?;
        assert_eq!(wtm::Entity::find().count(&db).await?, 0);
        assert!(matches!(delete_technology(&db, t.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
