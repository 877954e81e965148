use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::candidates::id::CandidateId;
use crate::errors::AppError;
use crate::models::candidate::{Candidate, CandidateDraft};
use crate::store::RecordStore;

/// Process-local record store. Contents are lost on restart.
/// Listing is ordered by `(created_at, id)`, matching the Postgres store.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<BTreeMap<CandidateId, Candidate>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert(&self, draft: CandidateDraft) -> Result<Candidate, AppError> {
        let candidate = Candidate {
            id: CandidateId::generate(),
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            cv_reference: draft.cv_reference,
            created_at: Utc::now(),
        };

        self.records
            .write()
            .await
            .insert(candidate.id.clone(), candidate.clone());
        Ok(candidate)
    }

    async fn find_by_id(&self, id: &CandidateId) -> Result<Option<Candidate>, AppError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Candidate>, AppError> {
        let mut candidates: Vec<Candidate> =
            self.records.read().await.values().cloned().collect();
        candidates.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        Ok(candidates)
    }

    async fn delete_by_id(&self, id: &CandidateId) -> Result<Option<Candidate>, AppError> {
        Ok(self.records.write().await.remove(id))
    }

    async fn close(&self) {}

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> CandidateDraft {
        CandidateDraft {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "440789012458".to_string(),
            cv_reference: format!("cv-{name}.pdf"),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_is_findable() {
        let store = MemoryRecordStore::new();
        let created = store.insert(draft("John")).await.unwrap();

        let found = store.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.name, "John");
    }

    #[tokio::test]
    async fn test_find_absent_returns_none() {
        let store = MemoryRecordStore::new();
        let id = CandidateId::parse("5d7221107a4812a1ac9e2999").unwrap();
        assert!(store.find_by_id(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_lists_in_insert_order() {
        let store = MemoryRecordStore::new();
        assert!(store.find_all().await.unwrap().is_empty());

        store.insert(draft("John")).await.unwrap();
        store.insert(draft("Jane")).await.unwrap();

        let names: Vec<_> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["John", "Jane"]);
    }

    #[tokio::test]
    async fn test_delete_returns_removed_then_none() {
        let store = MemoryRecordStore::new();
        let created = store.insert(draft("John")).await.unwrap();

        let removed = store.delete_by_id(&created.id).await.unwrap();
        assert_eq!(removed.map(|c| c.id), Some(created.id.clone()));
        assert!(store.delete_by_id(&created.id).await.unwrap().is_none());
        assert!(store.find_all().await.unwrap().is_empty());
    }
}
