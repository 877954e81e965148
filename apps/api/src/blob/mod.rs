//! Blob stores — where uploaded CVs live.
//!
//! A blob is addressed by the reference returned from `put`; the reference is what
//! gets recorded on the candidate.

pub mod fs;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::errors::AppError;

pub use fs::FsBlobStore;
pub use s3::S3BlobStore;

const MAX_EXTENSION_LEN: usize = 8;

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `data` under `name` and returns the reference for later retrieval.
    async fn put(
        &self,
        name: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<String, AppError>;

    async fn get(&self, reference: &str) -> Result<Option<Bytes>, AppError>;

    /// Returns whether something was removed, where the backend can tell.
    async fn delete(&self, reference: &str) -> Result<bool, AppError>;

    fn backend(&self) -> &'static str;
}

/// Derives a collision-free blob name, keeping a short alphanumeric extension from the
/// uploaded file name: `cv-<uuid>.pdf`.
pub fn derive_blob_name(original_file_name: Option<&str>) -> String {
    let extension = original_file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();

    format!("cv-{}{}", Uuid::new_v4(), extension)
}

/// Best-effort content type from a blob reference's extension.
pub fn content_type_for(reference: &str) -> &'static str {
    let extension = reference
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("txt") => "text/plain",
        Some("rtf") => "application/rtf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_lowercased_extension() {
        let name = derive_blob_name(Some("TonyAbbot.PDF"));
        assert!(name.starts_with("cv-"));
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn test_names_are_unique() {
        assert_ne!(
            derive_blob_name(Some("cv.pdf")),
            derive_blob_name(Some("cv.pdf"))
        );
    }

    #[test]
    fn test_suspicious_extension_dropped() {
        let name = derive_blob_name(Some("evil.pdf/../../etc"));
        assert!(!name.contains('/'));
        let name = derive_blob_name(Some("archive.verylongextension"));
        assert!(!name.contains('.'));
    }

    #[test]
    fn test_no_file_name_gives_bare_name() {
        let name = derive_blob_name(None);
        assert!(name.starts_with("cv-"));
        assert!(!name.contains('.'));
        assert!(!derive_blob_name(Some("README")).contains('.'));
    }

    #[test]
    fn test_content_type_guess() {
        assert_eq!(content_type_for("cv-1.pdf"), "application/pdf");
        assert!(content_type_for("cvs/cv-1.DOCX").starts_with("application/vnd"));
        assert_eq!(content_type_for("cv-1"), "application/octet-stream");
    }
}
