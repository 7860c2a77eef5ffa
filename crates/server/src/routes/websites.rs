use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use common::types::Message;
use models::enums::WebsiteType;
use serde_json::{json, Value};
use service::listing::{enum_filter, int_filter};
use service::uploads::WEBSITE_THUMBNAIL;
use service::websites::{self, CreateWebsiteInput, TechnologyMappingsInput, UpdateWebsiteInput, WebsiteFilter};
use tracing::info;

use crate::errors::JsonApiError;
use crate::extract::{ApiPath, ApiQuery, FormPayload, ListQuery};
use crate::routes::{paged, pagination};
use crate::state::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/websites", post(create))
        .route("/websites/list", get(list))
        .route("/websites/listing", get(listing))
        .route("/websites/:id", put(update).delete(remove))
        .route("/websites/:id/technology-mappings", put(set_technologies))
}

#[utoipa::path(
    post, path = "/api/websites", tag = "websites",
    request_body(content = crate::openapi::WebsiteFormDoc, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 413, description = "Thumbnail too large")
    )
)]
pub async fn create(State(state): State<ServerState>, mut body: FormPayload) -> Result<(StatusCode, Json<Value>), JsonApiError> {
    let thumbnail = body.files(&WEBSITE_THUMBNAIL)?.into_iter().next();
    let input: CreateWebsiteInput = body.decode()?;
    let website = websites::create_website(&state.db, state.assets.as_ref(), input, thumbnail).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Website created successfully", "website": website }))))
}

#[utoipa::path(
    get, path = "/api/websites/list", tag = "websites",
    params(ListQuery),
    responses((status = 200, description = "Websites page"), (status = 400, description = "Bad query parameter"))
)]
pub async fn list(State(state): State<ServerState>, ApiQuery(q): ApiQuery<ListQuery>) -> Result<Json<Value>, JsonApiError> {
    let page = pagination(&q)?;
    let result = websites::list_websites(&state.db, state.assets.as_ref(), page, q.keyword.as_deref()).await?;
    paged("websites", result)
}

/// Tag keyword plus exact client, technology and type filters.
#[utoipa::path(
    get, path = "/api/websites/listing", tag = "websites",
    params(ListQuery),
    responses((status = 200, description = "Websites page"), (status = 400, description = "Bad query parameter"))
)]
pub async fn listing(State(state): State<ServerState>, ApiQuery(q): ApiQuery<ListQuery>) -> Result<Json<Value>, JsonApiError> {
    let page = pagination(&q)?;
    let filter = WebsiteFilter {
        keyword: q.keyword.as_deref(),
        client_id: int_filter("client_id", q.client_id.as_deref())?,
        technology_id: int_filter("technology_id", q.technology_id.as_deref())?,
        kind: enum_filter::<WebsiteType>("type", q.kind.as_deref())?,
    };
    let result = websites::filter_websites(&state.db, state.assets.as_ref(), page, filter).await?;
    paged("websites", result)
}

#[utoipa::path(
    put, path = "/api/websites/{id}", tag = "websites",
    params(("id" = i32, Path, description = "Website ID")),
    request_body(content = crate::openapi::WebsiteFormDoc, content_type = "multipart/form-data"),
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
    let thumbnail = body.files(&WEBSITE_THUMBNAIL)?.into_iter().next();
    let input: UpdateWebsiteInput = body.decode()?;
    let website = websites::update_website(&state.db, state.assets.as_ref(), id, input, thumbnail).await?;
    Ok(Json(json!({ "message": "Website updated successfully", "website": website })))
}

#[utoipa::path(
    delete, path = "/api/websites/{id}", tag = "websites",
    params(("id" = i32, Path, description = "Website ID")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn remove(State(state): State<ServerState>, ApiPath(id): ApiPath<i32>) -> Result<Json<Value>, JsonApiError> {
    let website = websites::delete_website(&state.db, state.assets.as_ref(), id).await?;
    Ok(Json(json!({ "message": format!("Website with ID {id} deleted successfully"), "website": website })))
}

#[utoipa::path(
    put, path = "/api/websites/{id}/technology-mappings", tag = "websites",
    params(("id" = i32, Path, description = "Website ID")),
    request_body = crate::openapi::TechnologyMappingsDoc,
    responses(
        (status = 200, description = "Mappings replaced"),
        (status = 400, description = "Unknown technology ID"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn set_technologies(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i32>,
    body: FormPayload,
) -> Result<Json<Message>, JsonApiError> {
    body.no_files()?;
    let input: TechnologyMappingsInput = body.decode()?;
    let mappings = websites::set_technology_mappings(&state.db, id, input).await?;
    info!(id, count = mappings.len(), "website technologies replaced");
    Ok(Json(Message::new("Website-Technology mappings updated successfully")))
}
