//! Object storage for uploaded files.
//!
//! Entities only keep object keys; a `FileStore` turns a key into bytes on
//! disk or in a bucket and back into a public URL.

pub mod local;
pub mod s3;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use local::LocalDiskStore;
pub use s3::S3Store;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid object key: {0}")]
    InvalidKey(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("object store error: {0}")]
    Remote(String),
}

#[async_trait]
pub trait FileStore: Send + Sync {
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<(), StorageError>;
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
    fn public_url(&self, key: &str) -> String;
}

pub type SharedStore = Arc<dyn FileStore>;

/// Public URL for an optional key.
pub fn public_url_opt(store: &dyn FileStore, key: Option<&str>) -> Option<String> {
    key.filter(|k| !k.is_empty()).map(|k| store.public_url(k))
}

/// Remove an object whose row no longer points at it. Failures are logged and swallowed.
pub async fn delete_quietly(store: &dyn FileStore, key: Option<&str>) {
    let Some(key) = key.filter(|k| !k.is_empty()) else { return };
    if let Err(e) = store.delete(key).await {
        tracing::warn!(key, error = %e, "failed to delete stored object");
    }
}

/// Build the website/creative store: S3 when configured, otherwise local disk
/// under `{upload_dir}/uploads` served at `{public_base_url}/uploads`.
pub async fn asset_store_from_config(cfg: &configs::StorageConfig) -> SharedStore {
    match &cfg.s3 {
        Some(s3) => Arc::new(S3Store::from_config(s3).await),
        None => Arc::new(LocalDiskStore::new(
            std::path::Path::new(&cfg.upload_dir).join("uploads"),
            format!("{}/uploads", cfg.public_base_url.trim_end_matches('/')),
        )),
    }
}

/// Local store rooted at `upload_dir`, for keys that already start with `uploads/`.
pub fn local_store_from_config(cfg: &configs::StorageConfig) -> SharedStore {
    Arc::new(LocalDiskStore::new(&cfg.upload_dir, cfg.public_base_url.clone()))
}
