use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::enums::{TagEntityType, WebsiteType};
use models::validation::require_non_blank;
use models::{client, tag_mapping, technology, website, website_technology_mapping as wtm};

use crate::errors::ServiceError;
use crate::listing::{keyword_condition, non_blank};
use crate::pagination::{Page, Pagination};
use crate::serde_ext::{i32_list, opt_date, opt_i32};
use crate::storage::{delete_quietly, public_url_opt, FileStore};
use crate::uploads::{self, UploadedFile, WEBSITE_THUMBNAIL_PREFIX};
use crate::views::{ClientRef, TagRef, TechnologyRef};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateWebsiteInput {
    #[serde(default, deserialize_with = "opt_i32")]
    pub client_id: Option<i32>,
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: WebsiteType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "opt_date")]
    pub launch_date: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub created_by: Option<i32>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub updated_by: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateWebsiteInput {
    #[serde(default, deserialize_with = "opt_i32")]
    pub client_id: Option<i32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<WebsiteType>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "opt_date")]
    pub launch_date: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub created_by: Option<i32>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub updated_by: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TechnologyMappingsInput {
    #[serde(deserialize_with = "i32_list")]
    pub technology_ids: Vec<i32>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub created_by: Option<i32>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub updated_by: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct WebsiteFilter<'a> {
    pub keyword: Option<&'a str>,
    pub client_id: Option<i32>,
    pub technology_id: Option<i32>,
    pub kind: Option<WebsiteType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MappingView {
    pub id: i32,
    pub website_id: i32,
    pub technology_id: i32,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: DateTime<FixedOffset>,
    pub technology: Option<TechnologyRef>,
}

/// A website as returned to clients: the raw thumbnail key is replaced by its
/// public URL and the client, technologies and tags are embedded.
#[derive(Debug, Clone, Serialize)]
pub struct WebsiteView {
    pub id: i32,
    pub client_id: i32,
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: WebsiteType,
    pub description: Option<String>,
    pub launch_date: Option<DateTime<FixedOffset>>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    pub thumbnail_public_url: Option<String>,
    pub client: Option<ClientRef>,
    pub technologies: Vec<MappingView>,
    pub tags: Vec<TagRef>,
}

async fn find_or_404(db: &DatabaseConnection, id: i32) -> Result<website::Model, ServiceError> {
    website::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Website", id))
}

async fn ensure_client(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    if client::exists(db, id).await? {
        Ok(())
    } else {
        Err(ServiceError::BadRequest(format!("Client with ID {id} does not exist")))
    }
}

pub async fn create_website(
    db: &DatabaseConnection,
    store: &dyn FileStore,
    input: CreateWebsiteInput,
    thumbnail: Option<UploadedFile>,
) -> Result<website::Model, ServiceError> {
    let client_id = input.client_id.ok_or_else(|| ServiceError::BadRequest("Client ID is required".into()))?;
    let title = require_non_blank("title", &input.title)?;
    let url = require_non_blank("url", &input.url)?;
    ensure_client(db, client_id).await?;

    let key = match thumbnail {
        Some(f) => Some(uploads::store(store, WEBSITE_THUMBNAIL_PREFIX, f).await?),
        None => None,
    };
    let now = Utc::now().into();
    let am = website::ActiveModel {
        client_id: Set(client_id),
        title: Set(title),
        url: Set(url),
        kind: Set(input.kind),
        description: Set(input.description),
        thumbnail: Set(key.clone()),
        launch_date: Set(input.launch_date),
        created_by: Set(input.created_by),
        updated_by: Set(input.updated_by),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    match am.insert(db).await {
        Ok(m) => {
            info!(id = m.id, client_id, "created website");
            Ok(m)
        }
        Err(e) => {
            delete_quietly(store, key.as_deref()).await;
            Err(e.into())
        }
    }
}

/// `GET /websites/list`: title keyword only.
pub async fn list_websites(
    db: &DatabaseConnection,
    store: &dyn FileStore,
    page: Pagination,
    keyword: Option<&str>,
) -> Result<Page<WebsiteView>, ServiceError> {
    let mut q = website::Entity::find();
    if let Some(cond) = keyword_condition(&[website::Column::Title], keyword) {
        q = q.filter(cond);
    }
    fetch_page(db, store, q, page).await
}

/// `GET /websites/listing`: keyword over WEBSITE tags plus exact filters.
pub async fn filter_websites(
    db: &DatabaseConnection,
    store: &dyn FileStore,
    page: Pagination,
    filter: WebsiteFilter<'_>,
) -> Result<Page<WebsiteView>, ServiceError> {
    let mut q = website::Entity::find();
    if let Some(kw) = non_blank(filter.keyword) {
        let ids = tag_mapping::entity_ids_tagged(db, TagEntityType::Website, kw).await?;
        q = q.filter(website::Column::Id.is_in(ids));
    }
    if let Some(cid) = filter.client_id {
        q = q.filter(website::Column::ClientId.eq(cid));
    }
    if let Some(tid) = filter.technology_id {
        q = q.filter(
            website::Column::Id.in_subquery(
                Query::select()
                    .column(wtm::Column::WebsiteId)
                    .from(wtm::Entity)
                    .and_where(wtm::Column::TechnologyId.eq(tid))
                    .to_owned(),
            ),
        );
    }
    if let Some(kind) = filter.kind {
        q = q.filter(website::Column::Kind.eq(kind));
    }
    fetch_page(db, store, q, page).await
}

async fn fetch_page(
    db: &DatabaseConnection,
    store: &dyn FileStore,
    q: Select<website::Entity>,
    page: Pagination,
) -> Result<Page<WebsiteView>, ServiceError> {
    let paginator = q.order_by_desc(website::Column::Id).paginate(db, page.limit);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(page.page_index()).await?;
    let items = hydrate(db, store, rows).await?;
    Ok(Page::new(items, total, page))
}

/// Attach client, technology mappings and tags to each website.
pub async fn hydrate(
    db: &DatabaseConnection,
    store: &dyn FileStore,
    rows: Vec<website::Model>,
) -> Result<Vec<WebsiteView>, ServiceError> {
    let clients = rows.load_one(client::Entity, db).await?;
    let mappings = rows.load_many(wtm::Entity, db).await?;
    let tags = rows.load_many(tag_mapping::Entity, db).await?;

    let tech_ids: Vec<i32> = mappings.iter().flatten().map(|m| m.technology_id).collect();
    let techs: HashMap<i32, technology::Model> = if tech_ids.is_empty() {
        HashMap::new()
    } else {
        technology::Entity::find()
            .filter(technology::Column::Id.is_in(tech_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect()
    };

    let views = rows
        .into_iter()
        .zip(clients)
        .zip(mappings)
        .zip(tags)
        .map(|(((w, c), maps), tags)| WebsiteView {
            thumbnail_public_url: public_url_opt(store, w.thumbnail.as_deref()),
            id: w.id,
            client_id: w.client_id,
            title: w.title,
            url: w.url,
            kind: w.kind,
            description: w.description,
            launch_date: w.launch_date,
            created_by: w.created_by,
            updated_by: w.updated_by,
            created_at: w.created_at,
            updated_at: w.updated_at,
            client: c.map(ClientRef::from),
            technologies: maps
                .into_iter()
                .map(|m| MappingView {
                    technology: techs.get(&m.technology_id).cloned().map(TechnologyRef::from),
                    id: m.id,
                    website_id: m.website_id,
                    technology_id: m.technology_id,
                    created_by: m.created_by,
                    updated_by: m.updated_by,
                    created_at: m.created_at,
                })
                .collect(),
            tags: tags.into_iter().map(TagRef::from).collect(),
        })
        .collect();
    Ok(views)
}

/// Partial update. A new thumbnail replaces the stored object.
pub async fn update_website(
    db: &DatabaseConnection,
    store: &dyn FileStore,
    id: i32,
    input: UpdateWebsiteInput,
    thumbnail: Option<UploadedFile>,
) -> Result<website::Model, ServiceError> {
    let existing = find_or_404(db, id).await?;
    if let Some(cid) = input.client_id {
        ensure_client(db, cid).await?;
    }
    let old_thumbnail = existing.thumbnail.clone();
    let mut am: website::ActiveModel = existing.into();
    if let Some(cid) = input.client_id {
        am.client_id = Set(cid);
    }
    if let Some(t) = input.title {
        am.title = Set(require_non_blank("title", &t)?);
    }
    if let Some(u) = input.url {
        am.url = Set(require_non_blank("url", &u)?);
    }
    if let Some(k) = input.kind {
        am.kind = Set(k);
    }
    if let Some(d) = input.description {
        am.description = Set(Some(d));
    }
    if let Some(ld) = input.launch_date {
        am.launch_date = Set(Some(ld));
    }
    if let Some(by) = input.created_by {
        am.created_by = Set(Some(by));
    }
    if let Some(by) = input.updated_by {
        am.updated_by = Set(Some(by));
    }
    let new_key = match thumbnail {
        Some(f) => Some(uploads::store(store, WEBSITE_THUMBNAIL_PREFIX, f).await?),
        None => None,
    };
    if let Some(k) = &new_key {
        am.thumbnail = Set(Some(k.clone()));
    }
    am.updated_at = Set(Utc::now().into());
    let updated = match am.update(db).await {
        Ok(m) => m,
        Err(e) => {
            delete_quietly(store, new_key.as_deref()).await;
            return Err(e.into());
        }
    };
    if new_key.is_some() && old_thumbnail != new_key {
        delete_quietly(store, old_thumbnail.as_deref()).await;
    }
    info!(id, "updated website");
    Ok(updated)
}

/// Remove the stored thumbnail, then the row. Mappings and tags cascade.
pub async fn delete_website(db: &DatabaseConnection, store: &dyn FileStore, id: i32) -> Result<website::Model, ServiceError> {
    let existing = find_or_404(db, id).await?;
    delete_quietly(store, existing.thumbnail.as_deref()).await;
    website::Entity::delete_by_id(id).exec(db).await?;
    info!(id, "deleted website");
    Ok(existing)
}

/// Replace the website's technology set in one transaction.
pub async fn set_technology_mappings(
    db: &DatabaseConnection,
    id: i32,
    input: TechnologyMappingsInput,
) -> Result<Vec<wtm::Model>, ServiceError> {
    find_or_404(db, id).await?;
    let mut ids = input.technology_ids;
    ids.sort_unstable();
    ids.dedup();
    if !ids.is_empty() {
        let found = technology::Entity::find()
            .filter(technology::Column::Id.is_in(ids.clone()))
            .count(db)
            .await?;
        if found != ids.len() as u64 {
            return Err(ServiceError::BadRequest("One or more technology IDs are invalid".into()));
        }
    }

    let txn = db.begin().await?;
    wtm::Entity::delete_many().filter(wtm::Column::WebsiteId.eq(id)).exec(&txn).await?;
    let now: DateTime<FixedOffset> = Utc::now().into();
    let mut created = Vec::with_capacity(ids.len());
    for technology_id in ids {
        let m = wtm::ActiveModel {
            website_id: Set(id),
            technology_id: Set(technology_id),
            created_by: Set(input.created_by),
            updated_by: Set(input.updated_by),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        created.push(m);
    }
    txn.commit().await?;
    info!(id, count = created.len(), "replaced website technology mappings");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serde_ext::decode;
    use crate::storage::LocalDiskStore;
    use crate::technologies::{create_technology, CreateTechnologyInput};
    use crate::test_support::{get_db, seed_client};
    use serde_json::json;

    fn store() -> LocalDiskStore {
        LocalDiskStore::new(std::env::temp_dir().join(format!("cms-web-{}", uuid::Uuid::new_v4())), "http://cdn.test")
    }

    fn png(name: &str) -> UploadedFile {
        UploadedFile { field: "thumbnail".into(), file_name: name.into(), content_type: "image/png".into(), bytes: vec![9; 16] }
    }

    fn new_site(client_id: i32, title: &str) -> CreateWebsiteInput {
        decode(json!({"client_id": client_id.to_string(), "title": title, "url": "https://a.test", "type": "WEBSITE"})).unwrap()
    }

    async fn tech(db: &DatabaseConnection, name: &str) -> i32 {
        create_technology(db, CreateTechnologyInput { name: name.into(), created_by: None, updated_by: None })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn create_requires_existing_client() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let st = store();
        let missing: CreateWebsiteInput = decode(json!({"title": "x", "url": "https://x", "type": "LANDING_PAGE"}))?;
        let err = create_website(&db, &st, missing, None).await.unwrap_err();
        assert_eq!(err.to_string(), "Client ID is required");
        let err = create_website(&db, &st, new_site(5, "x"), None).await.unwrap_err();
        assert_eq!(err.to_string(), "Client with ID 5 does not exist");
        Ok(())
    }

    #[tokio::test]
    async fn thumbnail_lifecycle() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let st = store();
        seed_client(&db, 1, "Acme").await?;
        let w = create_website(&db, &st, new_site(1, "Shop"), Some(png("first shot.png"))).await?;
        let first = w.thumbnail.clone().unwrap();
        assert!(first.starts_with("public/websites/thumbnails/"));
        assert!(first.ends_with("_first_shot.png"));
        assert!(st.root().join(&first).exists());

        let w = update_website(&db, &st, w.id, UpdateWebsiteInput::default(), Some(png("second.png"))).await?;
        let second = w.thumbnail.clone().unwrap();
        assert_ne!(first, second);
        assert!(!st.root().join(&first).exists());
        assert!(st.root().join(&second).exists());

        let gone = delete_website(&db, &st, w.id).await?;
        assert_eq!(gone.id, w.id);
        assert!(!st.root().join(&second).exists());
        assert!(matches!(delete_website(&db, &st, w.id).await, Err(ServiceError::NotFound(_))));
        let _ = tokio::fs::remove_dir_all(st.root()).await;
        Ok(())
    }

    #[tokio::test]
    async fn list_embeds_relations_and_public_url() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let st = store();
        seed_client(&db, 1, "Acme").await?;
        let a = create_website(&db, &st, new_site(1, "Alpha Shop"), None).await?;
        let b = create_website(&db, &st, new_site(1, "Beta"), Some(png("b.png"))).await?;
        let rust = tech(&db, "Rust").await;
        set_technology_mappings(&db, a.id, decode(json!({"technology_ids": [rust]}))?).await?;

        let page = list_websites(&db, &st, Pagination::default(), None).await?;
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].id, b.id);
        let url = page.items[0].thumbnail_public_url.clone().unwrap();
        assert!(url.starts_with("http://cdn.test/public/websites/thumbnails/"));
        assert_eq!(page.items[1].client.as_ref().unwrap().client_name.as_deref(), Some("Acme"));
        assert_eq!(page.items[1].technologies[0].technology.as_ref().unwrap().name, "Rust");

        let json = serde_json::to_value(&page.items[1])?;
        assert!(json.get("thumbnail").is_none());
        assert_eq!(json["type"], "WEBSITE");

        let hits = list_websites(&db, &st, Pagination::default(), Some("alpha")).await?;
        assert_eq!(hits.total, 1);
        let _ = tokio::fs::remove_dir_all(st.root()).await;
        Ok(())
    }

    #[tokio::test]
    async fn mappings_replace_and_validate() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let st = store();
        seed_client(&db, 1, "Acme").await?;
        let w = create_website(&db, &st, new_site(1, "Shop"), None).await?;
        let t1 = tech(&db, "Rust").await;
        let t2 = tech(&db, "Postgres").await;

        let m = set_technology_mappings(&db, w.id, decode(json!({"technology_ids": [t1, t2, t1]}))?).await?;
        assert_eq!(m.len(), 2);
        let m = set_technology_mappings(&db, w.id, decode(json!({"technology_ids": t2.to_string()}))?).await?;
        assert_eq!(m.iter().map(|x| x.technology_id).collect::<Vec<_>>(), vec![t2]);

        let err = set_technology_mappings(&db, w.id, decode(json!({"technology_ids": [t1, 999]}))?).await.unwrap_err();
        assert_eq!(err.to_string(), "One or more technology IDs are invalid");
        let left = wtm::Entity::find().filter(wtm::Column::WebsiteId.eq(w.id)).count(&db).await?;
        assert_eq!(left, 1);

        assert!(matches!(
            set_technology_mappings(&db, 404, decode(json!({"technology_ids": []}))?).await,
            Err(ServiceError::NotFound(_))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn listing_filters_by_tag_technology_client_and_type() -> Result<(), anyhow::Error> {
        use crate::tag_mappings::{create_tag, CreateTagInput};

        let db = get_db().await?;
        let st = store();
        seed_client(&db, 1, "Acme").await?;
        seed_client(&db, 2, "Globex").await?;
        let a = create_website(&db, &st, new_site(1, "A"), None).await?;
        let b = create_website(&db, &st, new_site(2, "B"), None).await?;
        let c: CreateWebsiteInput = decode(json!({"client_id": 2, "title": "C", "url": "https://c", "type": "LANDING_PAGE"}))?;
        let c = create_website(&db, &st, c, None).await?;
        let rust = tech(&db, "Rust").await;
        set_technology_mappings(&db, b.id, decode(json!({"technology_ids": [rust]}))?).await?;
        let tag: CreateTagInput = decode(json!({"entity_type": "WEBSITE", "entity_id": a.id, "tag_name": "Fintech"}))?;
        create_tag(&db, tag).await?;

        let by_tag = filter_websites(&db, &st, Pagination::default(), WebsiteFilter { keyword: Some("FIN"), ..Default::default() }).await?;
        assert_eq!(by_tag.items.iter().map(|w| w.id).collect::<Vec<_>>(), vec![a.id]);
        assert_eq!(by_tag.items[0].tags[0].tag_name, "Fintech");

        let by_tech = filter_websites(&db, &st, Pagination::default(), WebsiteFilter { technology_id: Some(rust), ..Default::default() }).await?;
        assert_eq!(by_tech.items.iter().map(|w| w.id).collect::<Vec<_>>(), vec![b.id]);

        let by_client_type = filter_websites(
            &db,
            &st,
            Pagination::default(),
            WebsiteFilter { client_id: Some(2), kind: Some(WebsiteType::LandingPage), ..Default::default() },
        )
        .await?;
        assert_eq!(by_client_type.items.iter().map(|w| w.id).collect::<Vec<_>>(), vec![c.id]);

        let none = filter_websites(&db, &st, Pagination::default(), WebsiteFilter { keyword: Some("nope"), ..Default::default() }).await?;
        assert_eq!(none.total, 0);
        Ok(())
    }
}
