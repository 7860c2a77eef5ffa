//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the upload root and the given sub-directories exist.
pub async fn ensure_upload_dirs(root: &str, subdirs: &[&str]) -> anyhow::Result<()> {
    if tokio::fs::metadata(root).await.is_err() {
        warn!(%root, "upload root missing; creating it");
    }
    for sub in subdirs {
        let dir = Path::new(root).join(sub);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    }
    info!(%root, count = subdirs.len(), "upload directories ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_nested_dirs() {
        let root = format!("target/test-data/env-{}", std::process::id());
        ensure_upload_dirs(&root, &["uploads/videos/thumbnails"]).await.unwrap();
        assert!(Path::new(&root).join("uploads/videos/thumbnails").is_dir());
        let _ = tokio::fs::remove_dir_all(&root).await;
    }
}
