use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, LoaderTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::enums::ScopeType;
use models::{client, project, project_scope};

use crate::errors::ServiceError;
use crate::listing::keyword_condition;
use crate::pagination::{Page, Pagination};
use crate::serde_ext::{opt_bool, opt_date, opt_i32, req_i64};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProjectInput {
    #[serde(default)]
    pub description1: Option<String>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub priority: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ScopeInput {
    pub scope_type: ScopeType,
    #[serde(default, deserialize_with = "opt_bool")]
    pub is_selected: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ProjectSyncItem {
    #[serde(deserialize_with = "req_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "opt_i32")]
    pub client_id: Option<i32>,
    pub project_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub priority: Option<i32>,
    #[serde(default, deserialize_with = "opt_date")]
    pub startdate: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub scopes: Option<Vec<ScopeInput>>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ProjectSyncReport {
    pub created: u64,
    pub updated: u64,
}

impl ProjectSyncReport {
    pub fn message(&self) -> String {
        format!("Sync completed: {} projects created, {} projects updated", self.created, self.updated)
    }
}

/// A project together with its scope rows.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithScopes {
    #[serde(flatten)]
    pub project: project::Model,
    pub scopes: Vec<project_scope::Model>,
}

pub async fn list_projects(
    db: &DatabaseConnection,
    page: Pagination,
    keyword: Option<&str>,
    client_id: Option<i32>,
) -> Result<Page<ProjectWithScopes>, ServiceError> {
    let mut q = project::Entity::find();
    if let Some(cond) = keyword_condition(&[project::Column::ProjectName, project::Column::Description], keyword) {
        q = q.filter(cond);
    }
    if let Some(cid) = client_id {
        q = q.filter(project::Column::ClientId.eq(cid));
    }
    let paginator = q
        .order_by_desc(project::Column::Priority)
        .order_by_asc(project::Column::Id)
        .paginate(db, page.limit);
    let total = paginator.num_items().await?;
    let projects = paginator.fetch_page(page.page_index()).await?;
    let scopes = projects.load_many(project_scope::Entity, db).await?;
    let items = projects
        .into_iter()
        .zip(scopes)
        .map(|(project, scopes)| ProjectWithScopes { project, scopes })
        .collect();
    Ok(Page::new(items, total, page))
}

pub async fn update_project(db: &DatabaseConnection, id: i64, input: UpdateProjectInput) -> Result<project::Model, ServiceError> {
    let existing = project::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Project", id))?;
    let mut am: project::ActiveModel = existing.into();
    if let Some(d) = input.description1 {
        am.description1 = Set(Some(d));
    }
    if let Some(p) = input.priority {
        am.priority = Set(p);
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Create unknown projects and overwrite known ones, one transaction per row.
///
/// A reference to a missing client stops the run with `BadRequest`; rows
/// handled before it stay committed.
pub async fn sync_projects(db: &DatabaseConnection, items: Vec<ProjectSyncItem>) -> Result<ProjectSyncReport, ServiceError> {
    let mut report = ProjectSyncReport { created: 0, updated: 0 };
    for item in items {
        let name = models::validation::require_non_blank("projectName", &item.project_name)?;
        if let Some(cid) = item.client_id {
            if !client::exists(db, cid).await? {
                return Err(ServiceError::BadRequest(format!("Client with ID {cid} does not exist")));
            }
        }

        let txn = db.begin().await?;
        let now = Utc::now().into();
        match project::Entity::find_by_id(item.id).one(&txn).await? {
            None => {
                project::ActiveModel {
                    id: Set(item.id),
                    client_id: Set(item.client_id),
                    project_name: Set(name),
                    description: Set(item.description),
                    description1: Set(None),
                    priority: Set(item.priority.unwrap_or(0)),
                    start_date: Set(item.startdate),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&txn)
                .await?;
                report.created += 1;
            }
            Some(existing) => {
                let start_date = item.startdate.or(existing.start_date);
                let mut am: project::ActiveModel = existing.into();
                am.client_id = Set(item.client_id);
                am.project_name = Set(name);
                am.description = Set(item.description);
                am.priority = Set(item.priority.unwrap_or(0));
                am.start_date = Set(start_date);
                am.updated_at = Set(now);
                am.update(&txn).await?;
                project_scope::Entity::delete_many()
                    .filter(project_scope::Column::ProjectId.eq(item.id))
                    .exec(&txn)
                    .await?;
                report.updated += 1;
            }
        }
        insert_scopes(&txn, item.id, item.scopes.unwrap_or_default()).await?;
        txn.commit().await?;
    }
    info!(created = report.created, updated = report.updated, "project sync finished");
    Ok(report)
}

async fn insert_scopes<C: ConnectionTrait>(conn: &C, project_id: i64, scopes: Vec<ScopeInput>) -> Result<(), ServiceError> {
    if scopes.is_empty() {
        return Ok(());
    }
    let rows = scopes.into_iter().map(|s| project_scope::ActiveModel {
        project_id: Set(project_id),
        scope_type: Set(s.scope_type),
        is_selected: Set(s.is_selected.unwrap_or(false)),
        ..Default::default()
    });
    project_scope::Entity::insert_many(rows).exec(conn).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serde_ext::{decode, decode_batch};
    use crate::test_support::{get_db, seed_client};
    use serde_json::json;

    fn batch(v: serde_json::Value) -> Vec<ProjectSyncItem> {
        decode_batch(v, "projects", "Invalid projects data").unwrap()
    }

    #[tokio::test]
    async fn sync_creates_then_updates_and_replaces_scopes() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        seed_client(&db, 1, "Acme").await?;

        let r = sync_projects(
            &db,
            batch(json!({"projects": [{
                "id": "1700000000001", "clientId": 1, "projectName": "Site", "priority": 2,
                "startdate": "2024-01-15",
                "scopes": [{"scopeType": "WEBSITE", "isSelected": true}, {"scopeType": "SEO"}]
            }]})),
        )
        .await?;
        assert_eq!(r, ProjectSyncReport { created: 1, updated: 0 });

        let r = sync_projects(
            &db,
            batch(json!({"projects": [{
                "id": 1700000000001i64, "projectName": "Site v2",
                "scopes": [{"scopeType": "VIDEO"}]
            }]})),
        )
        .await?;
        assert_eq!(r.message(), "Sync completed: 0 projects created, 1 projects updated");

        let page = list_projects(&db, Pagination::default(), None, None).await?;
        let p = &page.items[0];
        assert_eq!(p.project.project_name, "Site v2");
        assert_eq!(p.project.priority, 0);
        assert!(p.project.client_id.is_none());
        assert!(p.project.start_date.is_some());
        assert_eq!(p.scopes.len(), 1);
        assert_eq!(p.scopes[0].scope_type, ScopeType::Video);
        assert!(!p.scopes[0].is_selected);

        let json = serde_json::to_value(p)?;
        assert_eq!(json["id"], "1700000000001");
        assert_eq!(json["scopes"][0]["scope_type"], "VIDEO");
        Ok(())
    }

    #[tokio::test]
    async fn missing_client_aborts_but_keeps_earlier_rows() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let err = sync_projects(
            &db,
            batch(json!({"projects": [
                {"id": 1, "projectName": "First"},
                {"id": 2, "projectName": "Second", "clientId": 42},
                {"id": 3, "projectName": "Third"}
            ]})),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Client with ID 42 does not exist");
        assert!(matches!(err, ServiceError::BadRequest(_)));
        let ids: Vec<i64> = project::Entity::find().all(&db).await?.into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);
        Ok(())
    }

    #[tokio::test]
    async fn list_filters_and_update() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        seed_client(&db, 1, "Acme").await?;
        sync_projects(
            &db,
            batch(json!({"projects": [
                {"id": 1, "projectName": "Brand refresh", "clientId": 1, "priority": 1},
                {"id": 2, "projectName": "Landing", "description": "refresh of the funnel", "priority": 5},
                {"id": 3, "projectName": "Other"}
            ]})),
        )
        .await?;

        let hits = list_projects(&db, Pagination::default(), Some("REFRESH"), None).await?;
        assert_eq!(hits.items.iter().map(|p| p.project.id).collect::<Vec<_>>(), vec![2, 1]);
        let by_client = list_projects(&db, Pagination::default(), None, Some(1)).await?;
        assert_eq!(by_client.total, 1);

        let p = update_project(&db, 3, decode(json!({"priority": 10, "description1": "pinned"}))?).await?;
        assert_eq!(p.priority, 10);
        let p = update_project(&db, 3, decode(json!({}))?).await?;
        assert_eq!(p.priority, 10);
        assert_eq!(p.description1.as_deref(), Some("pinned"));
        assert!(matches!(update_project(&db, 404, decode(json!({}))?).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
