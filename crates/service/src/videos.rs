use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::enums::{TagEntityType, VideoFormat, VideoType};
use models::validation::{require_non_blank, validate_http_url};
use models::{client, tag_mapping, video};

use crate::errors::ServiceError;
use crate::listing::{keyword_condition, non_blank};
use crate::pagination::{Page, Pagination};
use crate::serde_ext::opt_i32;
use crate::storage::{delete_quietly, public_url_opt, FileStore};
use crate::uploads::{self, UploadedFile, VIDEO_THUMBNAIL_PREFIX};
use crate::views::{ClientRef, TagRef};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateVideoInput {
    #[serde(default, deserialize_with = "opt_i32")]
    pub client_id: Option<i32>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub video_url: String,
    pub format: VideoFormat,
    #[serde(rename = "type")]
    pub kind: VideoType,
    #[serde(default, deserialize_with = "opt_i32")]
    pub created_by: Option<i32>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub updated_by: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateVideoInput {
    #[serde(default, deserialize_with = "opt_i32")]
    pub client_id: Option<i32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub format: Option<VideoFormat>,
    #[serde(default, rename = "type")]
    pub kind: Option<VideoType>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub created_by: Option<i32>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub updated_by: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct VideoFilter<'a> {
    pub keyword: Option<&'a str>,
    pub client_id: Option<i32>,
    pub kind: Option<VideoType>,
    pub format: Option<VideoFormat>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoView {
    pub id: i32,
    pub client_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub format: VideoFormat,
    #[serde(rename = "type")]
    pub kind: VideoType,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    pub thumbnail_public_url: Option<String>,
    pub client: Option<ClientRef>,
    pub tags: Vec<TagRef>,
}

async fn find_or_404(db: &DatabaseConnection, id: i32) -> Result<video::Model, ServiceError> {
    video::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Video", id))
}

async fn ensure_client(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    if !client::exists(db, id).await? {
        return Err(ServiceError::BadRequest(format!("Client with ID {id} does not exist")));
    }
    Ok(())
}

/// Thumbnails always go to the local store; the row keeps the relative path.
pub async fn create_video(
    db: &DatabaseConnection,
    store: &dyn FileStore,
    input: CreateVideoInput,
    thumbnail: Option<UploadedFile>,
) -> Result<video::Model, ServiceError> {
    let client_id = input.client_id.ok_or_else(|| ServiceError::BadRequest("Client ID is required".into()))?;
    let title = require_non_blank("title", &input.title)?;
    let video_url = validate_http_url("video_url", &input.video_url)?;
    ensure_client(db, client_id).await?;

    let path = match thumbnail {
        Some(f) => Some(uploads::store(store, VIDEO_THUMBNAIL_PREFIX, f).await?),
        None => None,
    };
    let now = Utc::now().into();
    let am = video::ActiveModel {
        client_id: Set(client_id),
        title: Set(title),
        description: Set(input.description),
        video_url: Set(video_url),
        thumbnail: Set(path.clone()),
        format: Set(input.format),
        kind: Set(input.kind),
        created_by: Set(input.created_by),
        updated_by: Set(input.updated_by),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    match am.insert(db).await {
        Ok(m) => {
            info!(id = m.id, client_id, "created video");
            Ok(m)
        }
        Err(e) => {
            delete_quietly(store, path.as_deref()).await;
            Err(e.into())
        }
    }
}

pub async fn list_videos(
    db: &DatabaseConnection,
    store: &dyn FileStore,
    page: Pagination,
    keyword: Option<&str>,
) -> Result<Page<VideoView>, ServiceError> {
    let mut q = video::Entity::find();
    if let Some(cond) = keyword_condition(&[video::Column::Title], keyword) {
        q = q.filter(cond);
    }
    fetch_page(db, store, q, page).await
}

/// Keyword over VIDEO tags plus exact client/type/format filters.
pub async fn filter_videos(
    db: &DatabaseConnection,
    store: &dyn FileStore,
    page: Pagination,
    filter: VideoFilter<'_>,
) -> Result<Page<VideoView>, ServiceError> {
    let mut q = video::Entity::find();
    if let Some(kw) = non_blank(filter.keyword) {
        let ids = tag_mapping::entity_ids_tagged(db, TagEntityType::Video, kw).await?;
        q = q.filter(video::Column::Id.is_in(ids));
    }
    if let Some(cid) = filter.client_id {
        q = q.filter(video::Column::ClientId.eq(cid));
    }
    if let Some(kind) = filter.kind {
        q = q.filter(video::Column::Kind.eq(kind));
    }
    if let Some(format) = filter.format {
        q = q.filter(video::Column::Format.eq(format));
    }
    fetch_page(db, store, q, page).await
}

async fn fetch_page(
    db: &DatabaseConnection,
    store: &dyn FileStore,
    q: Select<video::Entity>,
    page: Pagination,
) -> Result<Page<VideoView>, ServiceError> {
    let paginator = q.order_by_desc(video::Column::Id).paginate(db, page.limit);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(page.page_index()).await?;
    let clients = rows.load_one(client::Entity, db).await?;
    let tags = rows.load_many(tag_mapping::Entity, db).await?;
    let items = rows
        .into_iter()
        .zip(clients)
        .zip(tags)
        .map(|((v, c), tags)| VideoView {
            thumbnail_public_url: public_url_opt(store, v.thumbnail.as_deref()),
            id: v.id,
            client_id: v.client_id,
            title: v.title,
            description: v.description,
            video_url: v.video_url,
            format: v.format,
            kind: v.kind,
            created_by: v.created_by,
            updated_by: v.updated_by,
            created_at: v.created_at,
            updated_at: v.updated_at,
            client: c.map(ClientRef::from),
            tags: tags.into_iter().map(TagRef::from).collect(),
        })
        .collect();
    Ok(Page::new(items, total, page))
}

pub async fn update_video(
    db: &DatabaseConnection,
    store: &dyn FileStore,
    id: i32,
    input: UpdateVideoInput,
    thumbnail: Option<UploadedFile>,
) -> Result<video::Model, ServiceError> {
    let existing = find_or_404(db, id).await?;
    if let Some(cid) = input.client_id {
        ensure_client(db, cid).await?;
    }
    let old_thumbnail = existing.thumbnail.clone();
    let mut am: video::ActiveModel = existing.into();
    if let Some(cid) = input.client_id {
        am.client_id = Set(cid);
    }
    if let Some(t) = input.title {
        am.title = Set(require_non_blank("title", &t)?);
    }
    if let Some(d) = input.description {
        am.description = Set(Some(d));
    }
    if let Some(u) = input.video_url {
        am.video_url = Set(validate_http_url("video_url", &u)?);
    }
    if let Some(f) = input.format {
        am.format = Set(f);
    }
    if let Some(k) = input.kind {
        am.kind = Set(k);
    }
    if let Some(by) = input.created_by {
        am.created_by = Set(Some(by));
    }
    if let Some(by) = input.updated_by {
        am.updated_by = Set(Some(by));
    }
    let new_path = match thumbnail {
        Some(f) => Some(uploads::store(store, VIDEO_THUMBNAIL_PREFIX, f).await?),
        None => None,
    };
    if let Some(p) = &new_path {
        am.thumbnail = Set(Some(p.clone()));
    }
    am.updated_at = Set(Utc::now().into());
    let updated = match am.update(db).await {
        Ok(m) => m,
        Err(e) => {
            delete_quietly(store, new_path.as_deref()).await;
            return Err(e.into());
        }
    };
    if new_path.is_some() && old_thumbnail != new_path {
        delete_quietly(store, old_thumbnail.as_deref()).await;
    }
    info!(id, "updated video");
    Ok(updated)
}

pub async fn delete_video(db: &DatabaseConnection, store: &dyn FileStore, id: i32) -> Result<video::Model, ServiceError> {
    let existing = find_or_404(db, id).await?;
    delete_quietly(store, existing.thumbnail.as_deref()).await;
    video::Entity::delete_by_id(id).exec(db).await?;
    info!(id, "deleted video");
    Ok(existing)
}
