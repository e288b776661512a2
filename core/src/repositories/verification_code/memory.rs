//! In-memory implementation of VerificationCodeRepository
//!
//! Suitable for development, single-process deployments and tests. All
//! mutations happen under one write guard, which gives `mark_used` the same
//! compare-and-swap semantics as the conditional `UPDATE` of the SQL store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::verification_code::VerificationCode;
use crate::errors::StorageError;

use super::trait_::VerificationCodeRepository;

/// In-memory verification code store
#[derive(Debug, Default)]
pub struct InMemoryVerificationCodeRepository {
    records: RwLock<Vec<VerificationCode>>,
}

impl InMemoryVerificationCodeRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records ever inserted
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Copy of every record, in insertion order
    pub async fn snapshot(&self) -> Vec<VerificationCode> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl VerificationCodeRepository for InMemoryVerificationCodeRepository {
    async fn insert(&self, record: &VerificationCode) -> Result<(), StorageError> {
        let mut records = self.records.write().await;

        if records.iter().any(|r| r.id == record.id) {
            return Err(StorageError::Backend {
                message: format!("duplicate verification code id {}", record.id),
            });
        }

        records.push(record.clone());
        Ok(())
    }

    async fn count_issued_since(
        &self,
        email: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, StorageError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.email == email && r.created_at >= since)
            .count() as u64)
    }

    async fn most_recent_issued_at(
        &self,
        email: &str,
    ) -> Result<Option<DateTime<Utc>>, StorageError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.email == email)
            .map(|r| r.created_at)
            .max())
    }

    async fn find_consumable(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>, StorageError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| {
                r.email == email
                    && constant_time_eq(r.code.as_bytes(), code.as_bytes())
                    && r.is_consumable(now)
            })
            .max_by_key(|r| r.created_at)
            .map(|r| r.id))
    }

    async fn mark_used(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, StorageError> {
        let mut records = self.records.write().await;
        Ok(records
            .iter_mut()
            .find(|r| r.id == id)
            .map(|r| r.mark_used(now))
            .unwrap_or(false))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationCode>, StorageError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }
}
