use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use service::clients::{self, ClientSyncItem, UpdateClientInput};
use service::listing::int_filter;
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
            "/clients/list",
            get(list).route_layer(middleware::from_fn_with_state(state.clone(), require_bearer_token)),
        )
        .route("/clients/update/:id", put(update))
        .route("/clients/syncing", post(sync))
}

#[utoipa::path(
    get, path = "/api/clients/list", tag = "clients",
    params(ListQuery),
    responses(
        (status = 200, description = "Clients page"),
        (status = 400, description = "Bad query parameter"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = []))
)]
pub async fn list(State(state): State<ServerState>, ApiQuery(q): ApiQuery<ListQuery>) -> Result<Json<Value>, JsonApiError> {
    let page = pagination(&q)?;
    let country_id = int_filter("country_id", q.country_id.as_deref())?;
    let result = clients::list_clients(&state.db, page, q.keyword.as_deref(), country_id).await?;
    paged("clients", result)
}

#[utoipa::path(
    put, path = "/api/clients/update/{id}", tag = "clients",
    params(("id" = i32, Path, description = "Client ID")),
    request_body = crate::openapi::UpdateClientDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i32>,
    body: FormPayload,
) -> Result<Json<Value>, JsonApiError> {
    body.no_files()?;
    let input: UpdateClientInput = body.decode()?;
    let client = clients::update_client(&state.db, id, input).await?;
    info!(id, "client updated");
    Ok(Json(json!({ "message": "Client updated successfully", "client": client })))
}

#[utoipa::path(
    post, path = "/api/clients/syncing", tag = "clients",
    request_body = crate::openapi::ClientSyncDoc,
    responses(
        (status = 201, description = "Sync report"),
        (status = 400, description = "Invalid clients data")
    )
)]
pub async fn sync(State(state): State<ServerState>, body: FormPayload) -> Result<(StatusCode, Json<Value>), JsonApiError> {
    body.no_files()?;
    let items: Vec<ClientSyncItem> = decode_batch(body.fields, "clients", "Invalid clients data")?;
    let report = clients::sync_clients(&state.db, items).await?;
    info!(created = report.created, skipped = report.skipped, "clients synced");
    Ok((StatusCode::CREATED, Json(json!({ "message": report.message(), "created": report.created, "skipped": report.skipped }))))
}
