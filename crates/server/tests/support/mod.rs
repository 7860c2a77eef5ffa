#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use server::auth::JwtVerifier;
use server::state::ServerState;
use service::storage::LocalDiskStore;
use tower::ServiceExt;

pub const SECRET: &str = "test-secret";
pub const BOUNDARY: &str = "cms-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub upload_dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

pub async fn app() -> Result<TestApp, anyhow::Error> {
    let upload_dir = PathBuf::from("target/test-data").join(uuid::Uuid::new_v4().to_string());
    std::fs::create_dir_all(upload_dir.join("uploads"))?;
    let db = models::db::connect_in_memory().await?;
    let state = ServerState {
        db,
        verifier: Arc::new(JwtVerifier::new(SECRET)),
        assets: Arc::new(LocalDiskStore::new(upload_dir.join("uploads"), "http://cms.test/uploads")),
        local: Arc::new(LocalDiskStore::new(upload_dir.clone(), "http://cms.test")),
        upload_dir: upload_dir.clone(),
    };
    let router = server::routes::build_router(state, server::startup::build_cors(&[]));
    Ok(TestApp { router, upload_dir })
}

pub fn token(sub: &str) -> String {
    let exp = jsonwebtoken::get_current_timestamp() + 600;
    encode(
        &Header::default(),
        &json!({ "sub": sub, "email": "editor@example.com", "exp": exp }),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File { field: &'a str, name: &'a str, content_type: &'a str, bytes: &'a [u8] },
}

pub fn multipart(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes());
            }
            Part::File { field, name, content_type, bytes } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{field}\"; filename=\"{name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> Result<(StatusCode, Value), anyhow::Error> {
        let resp = self.router.clone().oneshot(req).await?;
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
        Ok((status, body))
    }

    pub async fn get(&self, uri: &str) -> Result<(StatusCode, Value), anyhow::Error> {
        self.send(Request::builder().uri(uri).body(Body::empty())?).await
    }

    pub async fn get_authed(&self, uri: &str) -> Result<(StatusCode, Value), anyhow::Error> {
        let req = Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token("user-1")))
            .body(Body::empty())?;
        self.send(req).await
    }

    pub async fn json(&self, method: &str, uri: &str, body: Value) -> Result<(StatusCode, Value), anyhow::Error> {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?;
        self.send(req).await
    }

    pub async fn form(&self, method: &str, uri: &str, parts: &[Part<'_>]) -> Result<(StatusCode, Value), anyhow::Error> {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(multipart(parts)))?;
        self.send(req).await
    }

    pub async fn delete(&self, uri: &str) -> Result<(StatusCode, Value), anyhow::Error> {
        self.send(Request::builder().method("DELETE").uri(uri).body(Body::empty())?).await
    }

    pub async fn seed_clients(&self, ids: &[i32]) -> Result<(), anyhow::Error> {
        let clients: Vec<Value> = ids.iter().map(|id| json!({ "id": id, "client_name": format!("Client {id}") })).collect();
        let (status, _) = self.json("POST", "/api/clients/syncing", json!({ "clients": clients })).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "seeding clients failed with {status}");
        Ok(())
    }
}
