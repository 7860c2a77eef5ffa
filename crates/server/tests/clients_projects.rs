mod support;

use axum::http::StatusCode;
use serde_json::json;
use support::app;

#[tokio::test]
async fn health_and_unknown_route() -> Result<(), anyhow::Error> {
    let app = app().await?;
    let (status, body) = app.get("/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.get("/api/nothing-here").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["statusCode"], 404);
    Ok(())
}

#[tokio::test]
async fn openapi_document_lists_routes() -> Result<(), anyhow::Error> {
    let app = app().await?;
    let (status, body) = app.get("/api-docs/openapi.json").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/websites/{id}/technology-mappings"].is_object());
    Ok(())
}

#[tokio::test]
async fn client_list_requires_bearer_token() -> Result<(), anyhow::Error> {
    let app = app().await?;
    let (status, body) = app.get("/api/clients/list").await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["statusCode"], 401);

    let req = axum::http::Request::builder()
        .uri("/api/clients/list")
        .header("authorization", "Bearer not-a-jwt")
        .body(axum::body::Body::empty())?;
    let (status, _) = app.send(req).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get_authed("/api/clients/list").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 10);
    Ok(())
}

#[tokio::test]
async fn client_sync_update_and_filtered_list() -> Result<(), anyhow::Error> {
    let app = app().await?;

    let (status, body) = app.json("POST", "/api/clients/syncing", json!({ "clients": "nope" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid clients data");

    let payload = json!({ "clients": [
        { "id": 1, "client_name": "Acme Foods", "country_id": 91, "priority": 2 },
        { "id": 2, "client_name": "Globex", "country_id": 44 }
    ]});
    let (status, body) = app.json("POST", "/api/clients/syncing", payload.clone()).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["created"], 2);
    let (_, body) = app.json("POST", "/api/clients/syncing", payload).await?;
    assert_eq!(body["skipped"], 2);
    assert_eq!(body["message"], "Sync completed: 0 clients created, 2 clients skipped (already exist)");

    let (status, body) = app.json("PUT", "/api/clients/update/2", json!({ "priority": 9 })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Client updated successfully");
    assert_eq!(body["client"]["priority"], 9);

    let (_, body) = app.json("PUT", "/api/clients/update/1", json!({ "description1": "Snacks" })).await?;
    assert_eq!(body["client"]["priority"], 0);
    assert_eq!(body["client"]["description1"], "Snacks");

    let (status, body) = app.json("PUT", "/api/clients/update/77", json!({ "priority": 1 })).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Client with ID 77 not found");

    let (_, body) = app.get_authed("/api/clients/list").await?;
    assert_eq!(body["clients"][0]["id"], 2);

    let (_, body) = app.get_authed("/api/clients/list?keyword=acme&country_id=91").await?;
    assert_eq!(body["total"], 1);
    assert_eq!(body["clients"][0]["client_name"], "Acme Foods");

    let (_, body) = app.get_authed("/api/clients/list?keyword=%25").await?;
    assert_eq!(body["total"], 0);
    let (_, body) = app.get_authed("/api/clients/list?keyword=_").await?;
    assert_eq!(body["total"], 0);

    let (status, _) = app.get_authed("/api/clients/list?country_id=india").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, body) = app.get_authed("/api/clients/list?page=0").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Query parameter \"page\" must be a positive integer");
    Ok(())
}

#[tokio::test]
async fn project_sync_creates_updates_and_lists_scopes() -> Result<(), anyhow::Error> {
    let app = app().await?;
    app.seed_clients(&[5]).await?;

    let (status, body) = app.json("POST", "/api/projects/syncing", json!({})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid projects data");

    let first = json!({ "projects": [{
        "id": 9007199254740993_i64, "clientId": 5, "projectName": "Relaunch", "priority": 3,
        "startdate": "2024-02-01",
        "scopes": [{ "scopeType": "WEBSITE", "isSelected": true }, { "scopeType": "SEO" }]
    }]});
    let (status, body) = app.json("POST", "/api/projects/syncing", first).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["created"], 1);

    let second = json!({ "projects": [{
        "id": "9007199254740993", "clientId": 5, "projectName": "Relaunch v2",
        "scopes": [{ "scopeType": "BRANDING" }]
    }]});
    let (status, body) = app.json("POST", "/api/projects/syncing", second).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Sync completed: 0 projects created, 1 projects updated");

    let (status, body) = app.get_authed("/api/projects/list?client_id=abc").await?;
    assert_eq!(status, StatusCode::OK);
    let project = &body["projects"][0];
    assert_eq!(project["id"], "9007199254740993");
    assert_eq!(project["project_name"], "Relaunch v2");
    assert_eq!(project["priority"], 0);
    assert_eq!(project["scopes"].as_array().map(Vec::len), Some(1));
    assert_eq!(project["scopes"][0]["scope_type"], "BRANDING");

    let (status, body) = app.json("PUT", "/api/projects/update/9007199254740993", json!({ "description1": "Phase 2" })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["project"]["description1"], "Phase 2");

    let missing_client = json!({ "projects": [
        { "id": 1, "projectName": "Ok" },
        { "id": 2, "clientId": 404, "projectName": "Broken" }
    ]});
    let (status, body) = app.json("POST", "/api/projects/syncing", missing_client).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Client with ID 404 does not exist");
    let (_, body) = app.get_authed("/api/projects/list").await?;
    assert_eq!(body["total"], 2);
    Ok(())
}
