use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use service::technologies::{self, CreateTechnologyInput, UpdateTechnologyInput};

use crate::errors::JsonApiError;
use crate::extract::{ApiPath, ApiQuery, FormPayload, ListQuery};
use crate::routes::{paged, pagination};
use crate::state::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/technologies", post(create))
        .route("/technologies/list", get(list))
        .route("/technologies/:id", put(update).delete(remove))
}

#[utoipa::path(
    post, path = "/api/technologies", tag = "technologies",
    request_body = crate::openapi::TechnologyDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn create(State(state): State<ServerState>, body: FormPayload) -> Result<(StatusCode, Json<Value>), JsonApiError> {
    body.no_files()?;
    let input: CreateTechnologyInput = body.decode()?;
    let technology = technologies::create_technology(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Technology created successfully", "technology": technology }))))
}

#[utoipa::path(
    get, path = "/api/technologies/list", tag = "technologies",
    params(ListQuery),
    responses((status = 200, description = "Technologies page with their websites"))
)]
pub async fn list(State(state): State<ServerState>, ApiQuery(q): ApiQuery<ListQuery>) -> Result<Json<Value>, JsonApiError> {
    let page = pagination(&q)?;
    let result = technologies::list_technologies(&state.db, page, q.keyword.as_deref()).await?;
    paged("technologies", result)
}

#[utoipa::path(
    put, path = "/api/technologies/{id}", tag = "technologies",
    params(("id" = i32, Path, description = "Technology ID")),
    request_body = crate::openapi::TechnologyDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i32>,
    body: FormPayload,
) -> Result<Json<Value>, JsonApiError> {
    body.no_files()?;
    let input: UpdateTechnologyInput = body.decode()?;
    let technology = technologies::update_technology(&state.db, id, input).await?;
    Ok(Json(json!({ "message": "Technology updated successfully", "technology": technology })))
}

#[utoipa::path(
    delete, path = "/api/technologies/{id}", tag = "technologies",
    params(("id" = i32, Path, description = "Technology ID")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn remove(State(state): State<ServerState>, ApiPath(id): ApiPath<i32>) -> Result<Json<Value>, JsonApiError> {
    let technology = technologies::delete_technology(&state.db, id).await?;
    Ok(Json(json!({ "message": format!("Technology with ID {id} deleted successfully"), "technology": technology })))
}
