use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{Map, Value};
use service::pagination::{Page, Pagination};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::errors::JsonApiError;
use crate::extract::ListQuery;
use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod clients;
pub mod creatives;
pub mod projects;
pub mod tag_mappings;
pub mod technologies;
pub mod videos;
pub mod websites;

/// Multipart bodies carry up to two 10 MiB creative files plus text fields.
const BODY_LIMIT: usize = 25 * 1024 * 1024;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn not_found() -> JsonApiError {
    JsonApiError::new(StatusCode::NOT_FOUND, "Route not found")
}

/// Parse `page`/`limit` off a list query.
pub(crate) fn pagination(q: &ListQuery) -> Result<Pagination, JsonApiError> {
    Ok(Pagination::from_query(q.page.as_deref(), q.limit.as_deref())?)
}

/// `{ <key>: [...], total, page, limit }`
pub(crate) fn paged<T: Serialize>(key: &str, page: Page<T>) -> Result<Json<Value>, JsonApiError> {
    let items = serde_json::to_value(page.items).map_err(|e| JsonApiError::internal(e.to_string()))?;
    let mut body = Map::new();
    body.insert(key.to_string(), items);
    body.insert("total".into(), page.total.into());
    body.insert("page".into(), page.page.into());
    body.insert("limit".into(), page.limit.into());
    Ok(Json(Value::Object(body)))
}

/// Build the application router: `/api/*` handlers, health, OpenAPI and the
/// local upload directory.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let uploads = ServeDir::new(state.upload_dir.join("uploads"));

    let api = Router::new()
        .merge(clients::router(&state))
        .merge(projects::router(&state))
        .merge(websites::router())
        .merge(videos::router())
        .merge(creatives::router())
        .merge(technologies::router())
        .merge(tag_mappings::router());

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api", api)
        .nest_service("/uploads", uploads)
        .fallback(not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one span per request with method and path
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx and transport failures
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
