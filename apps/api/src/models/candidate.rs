use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::candidates::id::CandidateId;

/// A persisted candidate. `cv` is the blob store reference of the uploaded résumé.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "cv")]
    pub cv_reference: String,
    pub created_at: DateTime<Utc>,
}

/// Everything a record store needs to mint a new candidate. The store assigns `id`
/// and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cv_reference: String,
}
