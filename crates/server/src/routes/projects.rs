use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use service::listing::lenient_int_filter;
use service::projects::{self, ProjectSyncItem, UpdateProjectInput};
use service::serde_ext::decode_batch;
use tracing::info;

use crate::auth::require_bearer_token;
use crate::errors::JsonApiError;
use crate::extract::{ApiPath, ApiQuery, FormPayload, ListQuery};
use crate::routes::{paged, pagination};
use crate::state::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .route(
            "/projects/list",
            get(list).route_layer(middleware::from_fn_with_state(state.clone(), require_bearer_token)),
        )
        .route("/projects/update/:id", put(update))
        .route("/projects/syncing", post(sync))
}

/// A non-numeric `client_id` is ignored rather than rejected.
#[utoipa::path(
    get, path = "/api/projects/list", tag = "projects",
    params(ListQuery),
    responses(
        (status = 200, description = "Projects page with scopes"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = []))
)]
pub async fn list(State(state): State<ServerState>, ApiQuery(q): ApiQuery<ListQuery>) -> Result<Json<Value>, JsonApiError> {
    let page = pagination(&q)?;
    let client_id = lenient_int_filter(q.client_id.as_deref());
    let result = projects::list_projects(&state.db, page, q.keyword.as_deref(), client_id).await?;
    paged("projects", result)
}

#[utoipa::path(
    put, path = "/api/projects/update/{id}", tag = "projects",
    params(("id" = i64, Path, description = "Project ID")),
    request_body = crate::openapi::UpdateProjectDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i64>,
    body: FormPayload,
) -> Result<Json<Value>, JsonApiError> {
    body.no_files()?;
    let input: UpdateProjectInput = body.decode()?;
    let project = projects::update_project(&state.db, id, input).await?;
    info!(id, "project updated");
    Ok(Json(json!({ "message": "Project updated successfully", "project": project })))
}

#[utoipa::path(
    post, path = "/api/projects/syncing", tag = "projects",
    request_body = crate::openapi::ProjectSyncDoc,
    responses(
        (status = 201, description = "Sync report"),
        (status = 400, description = "Invalid projects data or unknown client")
    )
)]
pub async fn sync(State(state): State<ServerState>, body: FormPayload) -> Result<(StatusCode, Json<Value>), JsonApiError> {
    body.no_files()?;
    let items: Vec<ProjectSyncItem> = decode_batch(body.fields, "projects", "Invalid projects data")?;
    let report = projects::sync_projects(&state.db, items).await?;
    info!(created = report.created, updated = report.updated, "projects synced");
    Ok((StatusCode::CREATED, Json(json!({ "message": report.message(), "created": report.created, "updated": report.updated }))))
}
