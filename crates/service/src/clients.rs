use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use models::client;

use crate::errors::ServiceError;
use crate::listing::keyword_condition;
use crate::pagination::{Page, Pagination};
use crate::serde_ext::{opt_i32, req_i32};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateClientInput {
    #[serde(default, deserialize_with = "opt_i32")]
    pub priority: Option<i32>,
    #[serde(default)]
    pub description1: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSyncItem {
    #[serde(deserialize_with = "req_i32")]
    pub id: i32,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub country_id: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description1: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub priority: Option<i32>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ClientSyncReport {
    pub created: u64,
    pub skipped: u64,
}

impl ClientSyncReport {
    pub fn message(&self) -> String {
        format!(
            "Sync completed: {} clients created, {} clients skipped (already exist)",
            self.created, self.skipped
        )
    }
}

/// Clients by descending priority, optionally filtered by keyword and country.
pub async fn list_clients(
    db: &DatabaseConnection,
    page: Pagination,
    keyword: Option<&str>,
    country_id: Option<i32>,
) -> Result<Page<client::Model>, ServiceError> {
    let mut q = client::Entity::find();
    if let Some(cond) = keyword_condition(
        &[client::Column::ClientName, client::Column::Description, client::Column::Description1],
        keyword,
    ) {
        q = q.filter(cond);
    }
    if let Some(cid) = country_id {
        q = q.filter(client::Column::CountryId.eq(cid));
    }
    let paginator = q
        .order_by_desc(client::Column::Priority)
        .order_by_asc(client::Column::Id)
        .paginate(db, page.limit);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page.page_index()).await?;
    Ok(Page::new(items, total, page))
}

/// Update priority and `description1`. An absent priority resets to 0 and an
/// absent `description1` keeps its value.
pub async fn update_client(db: &DatabaseConnection, id: i32, input: UpdateClientInput) -> Result<client::Model, ServiceError> {
    let existing = client::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Client", id))?;
    let mut am: client::ActiveModel = existing.into();
    am.priority = Set(input.priority.unwrap_or(0));
    if let Some(d) = input.description1 {
        am.description1 = Set(Some(d));
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    Ok(updated)
}

/// Insert clients whose id is unknown; existing ids are left untouched.
pub async fn sync_clients(db: &DatabaseConnection, items: Vec<ClientSyncItem>) -> Result<ClientSyncReport, ServiceError> {
    let mut report = ClientSyncReport { created: 0, skipped: 0 };
    for item in items {
        if client::exists(db, item.id).await? {
            debug!(id = item.id, "client already present, skipping");
            report.skipped += 1;
            continue;
        }
        let now = Utc::now().into();
        client::ActiveModel {
            id: Set(item.id),
            client_name: Set(item.client_name),
            country_id: Set(item.country_id),
            description: Set(item.description),
            description1: Set(item.description1),
            thumbnail: Set(item.thumbnail),
            priority: Set(item.priority.unwrap_or(0)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;
        report.created += 1;
    }
    info!(created = report.created, skipped = report.skipped, "client sync finished");
    Ok(report)
}
