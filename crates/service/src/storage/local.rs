use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{FileStore, StorageError};

/// Files under `root`, served publicly at `{url_base}/{key}`.
#[derive(Debug, Clone)]
pub struct LocalDiskStore {
    root: PathBuf,
    url_base: String,
}

impl LocalDiskStore {
    pub fn new(root: impl Into<PathBuf>, url_base: impl Into<String>) -> Self {
        let url_base = url_base.into().trim_end_matches('/').to_string();
        Self { root: root.into(), url_base }
    }

    pub fn root(&self) -> &Path { &self.root }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let rel = Path::new(key);
        let clean = !key.is_empty() && rel.components().all(|c| matches!(c, Component::Normal(_)));
        if !clean {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl FileStore for LocalDiskStore {
    async fn put(&self, key: &str, _content_type: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), "stored file");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.url_base, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> LocalDiskStore {
        let dir = std::env::temp_dir().join(format!("cms-store-{}", uuid::Uuid::new_v4()));
        LocalDiskStore::new(dir, "http://localhost:5000/")
    }

    #[tokio::test]
    async fn put_then_delete() {
        let store = temp_store();
        store.put("a/b/c.png", "image/png", vec![1, 2, 3]).await.unwrap();
        let on_disk = store.root().join("a/b/c.png");
        assert_eq!(tokio::fs::read(&on_disk).await.unwrap(), vec![1, 2, 3]);
        store.delete("a/b/c.png").await.unwrap();
        assert!(!on_disk.exists());
        // already gone
        store.delete("a/b/c.png").await.unwrap();
        let _ = tokio::fs::remove_dir_all(store.root()).await;
    }

    #[tokio::test]
    async fn rejects_escaping_keys() {
        let store = temp_store();
        assert!(matches!(store.put("../x", "text/plain", vec![]).await, Err(StorageError::InvalidKey(_))));
        assert!(matches!(store.delete("/etc/passwd").await, Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn public_url_joins_base_and_key() {
        let store = LocalDiskStore::new("/tmp", "http://localhost:5000/");
        assert_eq!(store.public_url("uploads/x.png"), "http://localhost:5000/uploads/x.png");
        let bare = LocalDiskStore::new("/tmp", "");
        assert_eq!(bare.public_url("uploads/x.png"), "/uploads/x.png");
    }
}
