use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::creative;
use models::enums::CreativeType;
use models::validation::require_non_blank;

use crate::errors::ServiceError;
use crate::listing::keyword_condition;
use crate::pagination::{Page, Pagination};
use crate::serde_ext::{opt_date, opt_i32};
use crate::storage::{delete_quietly, public_url_opt, FileStore};
use crate::uploads::{self, classify_creative, UploadedFile, CREATIVE_FILE_PREFIX, CREATIVE_THUMBNAIL_PREFIX};
use crate::views::UserRef;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCreativeInput {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CreativeType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub priority: Option<i32>,
    #[serde(default, deserialize_with = "opt_date")]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub created_by: Option<i32>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub updated_by: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCreativeInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<CreativeType>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub priority: Option<i32>,
    #[serde(default, deserialize_with = "opt_date")]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub created_by: Option<i32>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub updated_by: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreativeView {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub priority: i32,
    #[serde(rename = "type")]
    pub kind: CreativeType,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    pub file_public_url: Option<String>,
    pub thumbnail_public_url: Option<String>,
    #[serde(rename = "createdBy")]
    pub created_by_ref: Option<UserRef>,
    #[serde(rename = "updatedBy")]
    pub updated_by_ref: Option<UserRef>,
}

impl CreativeView {
    fn from_model(m: creative::Model, store: &dyn FileStore) -> Self {
        Self {
            file_public_url: public_url_opt(store, m.file.as_deref()),
            thumbnail_public_url: public_url_opt(store, m.thumbnail.as_deref()),
            created_by_ref: UserRef::from_id(m.created_by),
            updated_by_ref: UserRef::from_id(m.updated_by),
            id: m.id,
            name: m.name,
            description: m.description,
            priority: m.priority,
            kind: m.kind,
            created_by: m.created_by,
            updated_by: m.updated_by,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Keys written for one request; removed again if the row write fails.
#[derive(Default)]
struct StoredKeys {
    file: Option<String>,
    thumbnail: Option<String>,
}

impl StoredKeys {
    async fn put(store: &dyn FileStore, files: Vec<UploadedFile>) -> Result<Self, ServiceError> {
        let upload = classify_creative(files);
        let mut keys = StoredKeys::default();
        if let Some(f) = upload.file {
            keys.file = Some(uploads::store(store, CREATIVE_FILE_PREFIX, f).await?);
        }
        if let Some(t) = upload.thumbnail {
            match uploads::store(store, CREATIVE_THUMBNAIL_PREFIX, t).await {
                Ok(k) => keys.thumbnail = Some(k),
                Err(e) => {
                    keys.discard(store).await;
                    return Err(e);
                }
            }
        }
        Ok(keys)
    }

    async fn discard(&self, store: &dyn FileStore) {
        delete_quietly(store, self.file.as_deref()).await;
        delete_quietly(store, self.thumbnail.as_deref()).await;
    }
}

async fn find_or_404(db: &DatabaseConnection, id: i32) -> Result<creative::Model, ServiceError> {
    creative::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Creative", id))
}

pub async fn create_creative(
    db: &DatabaseConnection,
    store: &dyn FileStore,
    input: CreateCreativeInput,
    files: Vec<UploadedFile>,
) -> Result<creative::Model, ServiceError> {
    let name = require_non_blank("name", &input.name)?;
    let keys = StoredKeys::put(store, files).await?;
    let now: DateTime<FixedOffset> = Utc::now().into();
    let am = creative::ActiveModel {
        name: Set(name),
        description: Set(input.description),
        priority: Set(input.priority.unwrap_or(0)),
        kind: Set(input.kind),
        file: Set(keys.file.clone()),
        thumbnail: Set(keys.thumbnail.clone()),
        created_by: Set(input.created_by),
        updated_by: Set(input.updated_by),
        created_at: Set(input.created_at.unwrap_or(now)),
        updated_at: Set(now),
        ..Default::default()
    };
    match am.insert(db).await {
        Ok(m) => {
            info!(id = m.id, "created creative");
            Ok(m)
        }
        Err(e) => {
            keys.discard(store).await;
            Err(e.into())
        }
    }
}

/// Backs both `/creatives/list` and `/creatives/listing`.
pub async fn list_creatives(
    db: &DatabaseConnection,
    store: &dyn FileStore,
    page: Pagination,
    keyword: Option<&str>,
    kind: Option<CreativeType>,
) -> Result<Page<CreativeView>, ServiceError> {
    let mut q = creative::Entity::find();
    if let Some(cond) = keyword_condition(&[creative::Column::Name], keyword) {
        q = q.filter(cond);
    }
    if let Some(k) = kind {
        q = q.filter(creative::Column::Kind.eq(k));
    }
    let paginator = q.order_by_desc(creative::Column::Id).paginate(db, page.limit);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(page.page_index()).await?;
    Ok(Page::new(rows, total, page).map(|m| CreativeView::from_model(m, store)))
}

pub async fn update_creative(
    db: &DatabaseConnection,
    store: &dyn FileStore,
    id: i32,
    input: UpdateCreativeInput,
    files: Vec<UploadedFile>,
) -> Result<creative::Model, ServiceError> {
    let existing = find_or_404(db, id).await?;
    let (old_file, old_thumbnail) = (existing.file.clone(), existing.thumbnail.clone());
    let mut am: creative::ActiveModel = existing.into();
    if let Some(n) = input.name {
        am.name = Set(require_non_blank("name", &n)?);
    }
    if let Some(k) = input.kind {
        am.kind = Set(k);
    }
    if let Some(d) = input.description {
        am.description = Set(Some(d));
    }
    if let Some(p) = input.priority {
        am.priority = Set(p);
    }
    if let Some(c) = input.created_at {
        am.created_at = Set(c);
    }
    if let Some(by) = input.created_by {
        am.created_by = Set(Some(by));
    }
    if let Some(by) = input.updated_by {
        am.updated_by = Set(Some(by));
    }

    let keys = StoredKeys::put(store, files).await?;
    if let Some(k) = &keys.file {
        am.file = Set(Some(k.clone()));
    }
    if let Some(k) = &keys.thumbnail {
        am.thumbnail = Set(Some(k.clone()));
    }
    am.updated_at = Set(Utc::now().into());
    let updated = match am.update(db).await {
        Ok(m) => m,
        Err(e) => {
            keys.discard(store).await;
            return Err(e.into());
        }
    };
    if keys.file.is_some() && keys.file != old_file {
        delete_quietly(store, old_file.as_deref()).await;
    }
    if keys.thumbnail.is_some() && keys.thumbnail != old_thumbnail {
        delete_quietly(store, old_thumbnail.as_deref()).await;
    }
    info!(id, "updated creative");
    Ok(updated)
}

pub async fn delete_creative(db: &DatabaseConnection, store: &dyn FileStore, id: i32) -> Result<creative::Model, ServiceError> {
    let existing = find_or_404(db, id).await?;
    delete_quietly(store, existing.file.as_deref()).await;
    delete_quietly(store, existing.thumbnail.as_deref()).await;
    creative::Entity::delete_by_id(id).exec(db).await?;
    info!(id, "deleted creative");
    Ok(existing)
}
