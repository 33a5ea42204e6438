//! Local disk storage client
//!
//! Files live flat inside a single directory and are addressed by their
//! generated name (`{uuid}.{ext}`). Names coming back from clients are
//! checked before they are joined onto the directory.

use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::shared::validation::is_safe_file_name;

pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the storage directory if it does not exist yet
    pub async fn ensure_dir(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::Internal(format!(
                "Failed to create storage directory {}: {}",
                self.root.display(),
                e
            ))
        })?;

        debug!("Storage directory ready: {}", self.root.display());
        Ok(())
    }

    /// Write `data` under a fresh `{uuid}.{extension}` name and return that name
    pub async fn save(&self, extension: &str, data: &[u8]) -> Result<String, AppError> {
        let name = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.root.join(&name);

        tokio::fs::write(&path, data).await.map_err(|e| {
            tracing::error!("Failed to write {}: {}", path.display(), e);
            AppError::Internal("Failed to store file".to_string())
        })?;

        debug!("Stored {} ({} bytes)", name, data.len());
        Ok(name)
    }

    /// Path of a stored file, or `None` when the name is unsafe or nothing is stored under it
    pub async fn resolve(&self, name: &str) -> Option<PathBuf> {
        if !is_safe_file_name(name) {
            return None;
        }

        let path = self.root.join(name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage() -> DiskStorage {
        DiskStorage::new(std::env::temp_dir().join(format!("storefront-{}", Uuid::new_v4())))
    }

    #[tokio::test]
    async fn test_save_then_resolve() {
        let storage = temp_storage();
        storage.ensure_dir().await.unwrap();

        let name = storage.save("png", b"fake-png").await.unwrap();
        assert!(name.ends_with(".png"));

        let path = storage.resolve(&name).await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"fake-png");

        tokio::fs::remove_dir_all(storage.root()).await.unwrap();
    }

    #[tokio::test]
    async fn test_resolve_missing_or_unsafe_name() {
        let storage = temp_storage();
        storage.ensure_dir().await.unwrap();

        assert!(storage.resolve("missing.jpg").await.is_none());
        assert!(storage.resolve("../etc/passwd").await.is_none());
        assert!(storage.resolve("a/b.png").await.is_none());

        tokio::fs::remove_dir_all(storage.root()).await.unwrap();
    }

    #[tokio::test]
    async fn test_ensure_dir_is_idempotent() {
        let storage = temp_storage();
        storage.ensure_dir().await.unwrap();
        storage.ensure_dir().await.unwrap();
        assert!(storage.root().is_dir());

        tokio::fs::remove_dir_all(storage.root()).await.unwrap();
    }
}
