//! Controller logic for the candidate resource, independent of HTTP.
//!
//! Identifier shape and create-request validation are settled here before any store
//! is touched, so the two client-error classes never depend on a collaborator.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use crate::blob::{derive_blob_name, BlobStore};
use crate::candidates::id::CandidateId;
use crate::candidates::validation::{validate_new_candidate, CandidateForm};
use crate::errors::AppError;
use crate::models::candidate::{Candidate, CandidateDraft};
use crate::store::RecordStore;

#[derive(Clone)]
pub struct CandidateService {
    records: Arc<dyn RecordStore>,
    blobs: Arc<dyn BlobStore>,
}

impl CandidateService {
    pub fn new(records: Arc<dyn RecordStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { records, blobs }
    }

    /// Names of the active record and blob backends.
    pub fn backends(&self) -> (&'static str, &'static str) {
        (self.records.backend(), self.blobs.backend())
    }

    /// Releases the record store connection.
    pub async fn close(&self) {
        self.records.close().await;
    }

    pub async fn list(&self) -> Result<Vec<Candidate>, AppError> {
        self.records.find_all().await
    }

    /// `Ok(None)` for a well-formed id with no record; that is not an error.
    pub async fn fetch(&self, raw_id: &str) -> Result<Option<Candidate>, AppError> {
        let id = CandidateId::parse(raw_id)?;
        self.records.find_by_id(&id).await
    }

    /// Writes the CV first, then the record. A failed insert removes the CV again so
    /// no half-created candidate is left behind.
    pub async fn create(&self, form: CandidateForm) -> Result<Candidate, AppError> {
        let new = validate_new_candidate(form)?;

        let blob_name = derive_blob_name(new.cv.file_name.as_deref());
        let cv_reference = self
            .blobs
            .put(&blob_name, new.cv.data, new.cv.content_type.as_deref())
            .await?;

        let draft = CandidateDraft {
            name: new.name,
            email: new.email,
            phone: new.phone,
            cv_reference: cv_reference.clone(),
        };

        match self.records.insert(draft).await {
            Ok(candidate) => {
                info!("Created candidate {} (cv {})", candidate.id, cv_reference);
                Ok(candidate)
            }
            Err(e) => {
                if let Err(cleanup) = self.blobs.delete(&cv_reference).await {
                    warn!("Failed to remove orphaned cv {cv_reference}: {cleanup}");
                }
                Err(e)
            }
        }
    }

    /// Idempotent: deleting an absent (but well-formed) id succeeds.
    /// The candidate's CV goes with it, best effort.
    pub async fn delete(&self, raw_id: &str) -> Result<(), AppError> {
        let id = CandidateId::parse(raw_id)?;

        let Some(removed) = self.records.delete_by_id(&id).await? else {
            return Ok(());
        };
        info!("Deleted candidate {id}");

        match self.blobs.delete(&removed.cv_reference).await {
            Ok(true) => {}
            Ok(false) => warn!("CV {} of candidate {id} was already gone", removed.cv_reference),
            Err(e) => warn!("Failed to remove CV {} of candidate {id}: {e}", removed.cv_reference),
        }
        Ok(())
    }

    /// Returns the CV reference and contents of a candidate.
    pub async fn fetch_cv(&self, raw_id: &str) -> Result<(String, Bytes), AppError> {
        let id = CandidateId::parse(raw_id)?;

        let candidate = self
            .records
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;

        let data = self
            .blobs
            .get(&candidate.cv_reference)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("CV of candidate {id} not found")))?;

        Ok((candidate.cv_reference, data))
    }
}
