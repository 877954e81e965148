use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use tracing::info;

use crate::blob::BlobStore;
use crate::errors::AppError;

/// Blobs as flat files under a root directory. References are bare file names.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Opens the store, creating `root` if needed.
    pub async fn open(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("Failed to create upload folder {}", root.display()))?;

        info!("Blob store rooted at {}", root.display());
        Ok(Self { root })
    }

    fn resolve(&self, reference: &str) -> Result<PathBuf, AppError> {
        let is_plain_name = !reference.is_empty()
            && reference != "."
            && reference != ".."
            && !reference.contains(|c: char| c == '/' || c == '\\');
        if !is_plain_name {
            return Err(AppError::Storage(format!(
                "Refusing blob reference '{reference}'"
            )));
        }
        Ok(self.root.join(reference))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(
        &self,
        name: &str,
        data: Bytes,
        _content_type: Option<&str>,
    ) -> Result<String, AppError> {
        let path = self.resolve(name)?;
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| AppError::Storage(format!("Write to {} failed: {e}", path.display())))?;

        Ok(name.to_string())
    }

    async fn get(&self, reference: &str) -> Result<Option<Bytes>, AppError> {
        let path = self.resolve(reference)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Storage(format!(
                "Read of {} failed: {e}",
                path.display()
            ))),
        }
    }

    async fn delete(&self, reference: &str) -> Result<bool, AppError> {
        let path = self.resolve(reference)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::Storage(format!(
                "Removal of {} failed: {e}",
                path.display()
            ))),
        }
    }

    fn backend(&self) -> &'static str {
        "fs"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("uploaded_test_cv");
        FsBlobStore::open(&root).await.unwrap();
        assert!(root.is_dir());
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).await.unwrap();

        let reference = store
            .put("cv-1.pdf", Bytes::from_static(b"%PDF"), Some("application/pdf"))
            .await
            .unwrap();
        assert_eq!(reference, "cv-1.pdf");
        assert!(dir.path().join("cv-1.pdf").is_file());
        assert_eq!(
            store.get(&reference).await.unwrap(),
            Some(Bytes::from_static(b"%PDF"))
        );

        assert!(store.delete(&reference).await.unwrap());
        assert!(!store.delete(&reference).await.unwrap());
        assert!(store.get(&reference).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_path_escaping_references_refused() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).await.unwrap();

        for reference in ["../secret", "a/b.pdf", "..", "", "a\\b"] {
            assert!(
                matches!(store.get(reference).await, Err(AppError::Storage(_))),
                "{reference} should be refused"
            );
        }
    }
}
