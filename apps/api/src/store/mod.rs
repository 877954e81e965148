//! Record stores — the persistent candidate collection.
//!
//! `AppState` carries an `Arc<dyn RecordStore>`, picked at startup from `RECORD_STORE`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::candidates::id::CandidateId;
use crate::errors::AppError;
use crate::models::candidate::{Candidate, CandidateDraft};

pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persists a new candidate. The store assigns its id.
    async fn insert(&self, draft: CandidateDraft) -> Result<Candidate, AppError>;

    async fn find_by_id(&self, id: &CandidateId) -> Result<Option<Candidate>, AppError>;

    async fn find_all(&self) -> Result<Vec<Candidate>, AppError>;

    /// Removes the candidate if present and returns what was removed.
    async fn delete_by_id(&self, id: &CandidateId) -> Result<Option<Candidate>, AppError>;

    /// Releases the underlying connection. Called once at shutdown.
    async fn close(&self);

    fn backend(&self) -> &'static str;
}
