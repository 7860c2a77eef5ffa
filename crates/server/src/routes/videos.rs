use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use models::enums::{VideoFormat, VideoType};
use serde_json::{json, Value};
use service::listing::{enum_filter, int_filter};
use service::uploads::VIDEO_THUMBNAIL;
use service::videos::{self, CreateVideoInput, UpdateVideoInput, VideoFilter};

use crate::errors::JsonApiError;
use crate::extract::{ApiPath, ApiQuery, FormPayload, ListQuery};
use crate::routes::{paged, pagination};
use crate::state::ServerState;

// Video thumbnails always live on the local store.
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/videos", post(create))
        .route("/videos/list", get(list))
        .route("/videos/listing", get(listing))
        .route("/videos/:id", put(update).delete(remove))
}

#[utoipa::path(
    post, path = "/api/videos", tag = "videos",
    request_body(content = crate::openapi::VideoFormDoc, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 413, description = "Thumbnail too large")
    )
)]
pub async fn create(State(state): State<ServerState>, mut body: FormPayload) -> Result<(StatusCode, Json<Value>), JsonApiError> {
    let thumbnail = body.files(&VIDEO_THUMBNAIL)?.into_iter().next();
    let input: CreateVideoInput = body.decode()?;
    let video = videos::create_video(&state.db, state.local.as_ref(), input, thumbnail).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Video created successfully", "video": video }))))
}

#[utoipa::path(
    get, path = "/api/videos/list", tag = "videos",
    params(ListQuery),
    responses((status = 200, description = "Videos page"))
)]
pub async fn list(State(state): State<ServerState>, ApiQuery(q): ApiQuery<ListQuery>) -> Result<Json<Value>, JsonApiError> {
    let page = pagination(&q)?;
    let result = videos::list_videos(&state.db, state.local.as_ref(), page, q.keyword.as_deref()).await?;
    paged("videos", result)
}

#[utoipa::path(
    get, path = "/api/videos/listing", tag = "videos",
    params(ListQuery),
    responses((status = 200, description = "Videos page"), (status = 400, description = "Bad query parameter"))
)]
pub async fn listing(State(state): State<ServerState>, ApiQuery(q): ApiQuery<ListQuery>) -> Result<Json<Value>, JsonApiError> {
    let page = pagination(&q)?;
    let filter = VideoFilter {
        keyword: q.keyword.as_deref(),
        client_id: int_filter("client_id", q.client_id.as_deref())?,
        kind: enum_filter::<VideoType>("type", q.kind.as_deref())?,
        format: enum_filter::<VideoFormat>("format", q.format.as_deref())?,
    };
    let result = videos::filter_videos(&state.db, state.local.as_ref(), page, filter).await?;
    paged("videos", result)
}

#[utoipa::path(
    put, path = "/api/videos/{id}", tag = "videos",
    params(("id" = i32, Path, description = "Video ID")),
    request_body(content = crate::openapi::VideoFormDoc, content_type = "multipart/form-data"),
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
    let thumbnail = body.files(&VIDEO_THUMBNAIL)?.into_iter().next();
    let input: UpdateVideoInput = body.decode()?;
    let video = videos::update_video(&state.db, state.local.as_ref(), id, input, thumbnail).await?;
    Ok(Json(json!({ "message": "Video updated successfully", "video": video })))
}

#[utoipa::path(
    delete, path = "/api/videos/{id}", tag = "videos",
    params(("id" = i32, Path, description = "Video ID")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn remove(State(state): State<ServerState>, ApiPath(id): ApiPath<i32>) -> Result<Json<Value>, JsonApiError> {
    let video = videos::delete_video(&state.db, state.local.as_ref(), id).await?;
    Ok(Json(json!({ "message": format!("Video with ID {id} deleted successfully"), "video": video })))
}
