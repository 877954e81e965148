use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::candidates::id::CandidateId;
use crate::errors::AppError;
use crate::models::candidate::{Candidate, CandidateDraft};
use crate::store::RecordStore;

/// Candidate collection in the `candidates` table.
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert(&self, draft: CandidateDraft) -> Result<Candidate, AppError> {
        let candidate = sqlx::query_as::<_, Candidate>(
            r#"
            INSERT INTO candidates (id, name, email, phone, cv_reference)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, phone, cv_reference, created_at
            "#,
        )
        .bind(CandidateId::generate())
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.phone)
        .bind(&draft.cv_reference)
        .fetch_one(&self.pool)
        .await?;

        Ok(candidate)
    }

    async fn find_by_id(&self, id: &CandidateId) -> Result<Option<Candidate>, AppError> {
        let candidate = sqlx::query_as::<_, Candidate>(
            "SELECT id, name, email, phone, cv_reference, created_at FROM candidates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(candidate)
    }

    async fn find_all(&self) -> Result<Vec<Candidate>, AppError> {
        let candidates = sqlx::query_as::<_, Candidate>(
            "SELECT id, name, email, phone, cv_reference, created_at FROM candidates ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(candidates)
    }

    async fn delete_by_id(&self, id: &CandidateId) -> Result<Option<Candidate>, AppError> {
        let removed = sqlx::query_as::<_, Candidate>(
            r#"
            DELETE FROM candidates WHERE id = $1
            RETURNING id, name, email, phone, cv_reference, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(removed)
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL connection pool closed");
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
