use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use models::enums::TagEntityType;
use serde_json::{json, Value};
use service::tag_mappings::{self, CreateTagInput};

use crate::errors::JsonApiError;
use crate::extract::{ApiPath, FormPayload};
use crate::state::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/tag-mappings", post(create))
        .route("/tag-mappings/website/:website_id", get(for_website))
        .route("/tag-mappings/video/:video_id", get(for_video))
        .route("/tag-mappings/:id", delete(remove))
}

#[utoipa::path(
    post, path = "/api/tag-mappings", tag = "tag-mappings",
    request_body = crate::openapi::TagMappingDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error or duplicate tag"),
        (status = 404, description = "Target entity not found")
    )
)]
pub async fn create(State(state): State<ServerState>, body: FormPayload) -> Result<(StatusCode, Json<Value>), JsonApiError> {
    body.no_files()?;
    let input: CreateTagInput = body.decode()?;
    let tag = tag_mappings::create_tag(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Tag mapping created successfully", "tagMapping": tag }))))
}

async fn tags_response(state: &ServerState, kind: TagEntityType, id: i32) -> Result<Json<Value>, JsonApiError> {
    let tags = tag_mappings::tags_for(&state.db, kind, id).await?;
    Ok(Json(json!({ "message": "Tags retrieved successfully", "tags": tags })))
}

#[utoipa::path(
    get, path = "/api/tag-mappings/website/{website_id}", tag = "tag-mappings",
    params(("website_id" = i32, Path, description = "Website ID")),
    responses((status = 200, description = "Tags, newest first"))
)]
pub async fn for_website(State(state): State<ServerState>, ApiPath(id): ApiPath<i32>) -> Result<Json<Value>, JsonApiError> {
    tags_response(&state, TagEntityType::Website, id).await
}

#[utoipa::path(
    get, path = "/api/tag-mappings/video/{video_id}", tag = "tag-mappings",
    params(("video_id" = i32, Path, description = "Video ID")),
    responses((status = 200, description = "Tags, newest first"))
)]
pub async fn for_video(State(state): State<ServerState>, ApiPath(id): ApiPath<i32>) -> Result<Json<Value>, JsonApiError> {
    tags_response(&state, TagEntityType::Video, id).await
}

#[utoipa::path(
    delete, path = "/api/tag-mappings/{id}", tag = "tag-mappings",
    params(("id" = i32, Path, description = "Tag mapping ID")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn remove(State(state): State<ServerState>, ApiPath(id): ApiPath<i32>) -> Result<Json<Value>, JsonApiError> {
    let tag = tag_mappings::delete_tag(&state.db, id).await?;
    Ok(Json(json!({ "message": format!("Tag mapping with ID {id} deleted successfully"), "tagMapping": tag })))
}
