use std::path::PathBuf;
use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::storage::SharedStore;

use crate::auth::TokenVerifier;

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub verifier: Arc<dyn TokenVerifier>,
    /// Website and creative files (S3 or local fallback).
    pub assets: SharedStore,
    /// Video thumbnails, always on local disk.
    pub local: SharedStore,
    /// Root of the local store; `/uploads` is served from `{upload_dir}/uploads`.
    pub upload_dir: PathBuf,
}
