use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use models::enums::CreativeType;
use serde_json::{json, Value};
use service::creatives::{self, CreateCreativeInput, UpdateCreativeInput};
use service::listing::enum_filter;
use service::uploads::CREATIVE_FILES;
use tracing::debug;

use crate::errors::JsonApiError;
use crate::extract::{ApiPath, ApiQuery, FormPayload, ListQuery};
use crate::routes::{paged, pagination};
use crate::state::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/creatives", post(create))
        .route("/creatives/list", get(list))
        .route("/creatives/listing", get(list))
        .route("/creatives/:id", put(update).delete(remove))
}

#[utoipa::path(
    post, path = "/api/creatives", tag = "creatives",
    request_body(content = crate::openapi::CreativeFormDoc, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 413, description = "File too large")
    )
)]
pub async fn create(State(state): State<ServerState>, mut body: FormPayload) -> Result<(StatusCode, Json<Value>), JsonApiError> {
    let files = body.files(&CREATIVE_FILES)?;
    let input: CreateCreativeInput = body.decode()?;
    debug!(files = files.len(), "creating creative");
    let creative = creatives::create_creative(&state.db, state.assets.as_ref(), input, files).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Creative created successfully", "creative": creative }))))
}

/// Serves both `/creatives/list` and `/creatives/listing`.
#[utoipa::path(
    get, path = "/api/creatives/list", tag = "creatives",
    params(ListQuery),
    responses((status = 200, description = "Creatives page"), (status = 400, description = "Bad query parameter"))
)]
pub async fn list(State(state): State<ServerState>, ApiQuery(q): ApiQuery<ListQuery>) -> Result<Json<Value>, JsonApiError> {
    let page = pagination(&q)?;
    let kind = enum_filter::<CreativeType>("type", q.kind.as_deref())?;
    let result = creatives::list_creatives(&state.db, state.assets.as_ref(), page, q.keyword.as_deref(), kind).await?;
    paged("creatives", result)
}

#[utoipa::path(
    put, path = "/api/creatives/{id}", tag = "creatives",
    params(("id" = i32, Path, description = "Creative ID")),
    request_body(content = crate::openapi::CreativeFormDoc, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i32>,
    mut body: FormPayload,
) -> Result<Json<Value>, JsonApiError> {
    let files = body.files(&CREATIVE_FILES)?;
    let input: UpdateCreativeInput = body.decode()?;
    let creative = creatives::update_creative(&state.db, state.assets.as_ref(), id, input, files).await?;
    Ok(Json(json!({ "message": "Creative updated successfully", "creative": creative })))
}

#[utoipa::path(
    delete, path = "/api/creatives/{id}", tag = "creatives",
    params(("id" = i32, Path, description = "Creative ID")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn remove(State(state): State<ServerState>, ApiPath(id): ApiPath<i32>) -> Result<Json<Value>, JsonApiError> {
    let creative = creatives::delete_creative(&state.db, state.assets.as_ref(), id).await?;
    Ok(Json(json!({ "message": format!("Creative with ID {id} deleted successfully"), "creative": creative })))
}
