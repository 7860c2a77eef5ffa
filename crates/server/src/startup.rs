use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use configs::AppConfig;
use service::storage::{asset_store_from_config, local_store_from_config};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::auth::JwtVerifier;
use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

/// Sub-directories of the upload root that must exist before serving.
const UPLOAD_SUBDIRS: &[&str] = &["uploads/videos/thumbnails", "uploads/public"];

/// Configured origins with credentials; unparsable entries are skipped.
pub fn build_cors(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Connect, migrate and assemble the shared handler state.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    models::db::migrate(&db).await.map_err(|e| StartupError::Database(e.to_string()))?;

    common::env::ensure_upload_dirs(&cfg.storage.upload_dir, UPLOAD_SUBDIRS).await?;
    let assets = asset_store_from_config(&cfg.storage).await;
    let local = local_store_from_config(&cfg.storage);
    if cfg.storage.s3.is_some() {
        info!("website and creative files go to S3");
    }

    Ok(ServerState {
        db,
        verifier: Arc::new(JwtVerifier::new(&cfg.auth.jwt_secret)),
        assets,
        local,
        upload_dir: PathBuf::from(&cfg.storage.upload_dir),
    })
}

/// Serve until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))?;
    let state = build_state(&cfg).await?;
    let app = routes::build_router(state, build_cors(&cfg.server.cors_origins));

    info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("server drained");
    Ok(())
}
