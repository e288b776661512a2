//! Mock implementations for testing verification services

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::entities::verification_code::VerificationCode;
use crate::errors::StorageError;
use crate::repositories::{InMemoryVerificationCodeRepository, VerificationCodeRepository};
use crate::services::verification::EmailNotifierTrait;

pub const EMAIL: &str = "user@example.com";

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 8, 0, 0).unwrap()
}

// Mock notifier recording every delivery attempt
pub struct MockNotifier {
    pub sent: Mutex<Vec<(String, String, i64)>>,
    pub should_fail: bool,
}

impl MockNotifier {
    pub fn new(should_fail: bool) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            should_fail,
        }
    }

    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _, _)| to == email)
            .map(|(_, code, _)| code.clone())
    }

    pub fn attempts(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl EmailNotifierTrait for MockNotifier {
    async fn send_verification_code(
        &self,
        email: &str,
        code: &str,
        expire_minutes: i64,
    ) -> Result<String, String> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), code.to_string(), expire_minutes));
        if self.should_fail {
            return Err("Email service error".to_string());
        }
        Ok(format!("mock-msg-{}", Uuid::new_v4()))
    }
}

// In-memory store that counts every call made to it
#[derive(Default)]
pub struct CountingRepository {
    pub inner: InMemoryVerificationCodeRepository,
    pub calls: AtomicUsize,
}

impl CountingRepository {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl VerificationCodeRepository for CountingRepository {
    async fn insert(&self, record: &VerificationCode) -> Result<(), StorageError> {
        self.hit();
        self.inner.insert(record).await
    }

    async fn count_issued_since(&self, email: &str, since: DateTime<Utc>) -> Result<u64, StorageError> {
        self.hit();
        self.inner.count_issued_since(email, since).await
    }

    async fn most_recent_issued_at(&self, email: &str) -> Result<Option<DateTime<Utc>>, StorageError> {
        self.hit();
        self.inner.most_recent_issued_at(email).await
    }

    async fn find_consumable(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>, StorageError> {
        self.hit();
        self.inner.find_consumable(email, code, now).await
    }

    async fn mark_used(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, StorageError> {
        self.hit();
        self.inner.mark_used(id, now).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationCode>, StorageError> {
        self.hit();
        self.inner.find_by_id(id).await
    }
}

// Store whose backend is down
pub struct FailingRepository;

fn backend_down() -> StorageError {
    StorageError::backend("connection refused")
}

#[async_trait]
impl VerificationCodeRepository for FailingRepository {
    async fn insert(&self, _record: &VerificationCode) -> Result<(), StorageError> {
        Err(backend_down())
    }

    async fn count_issued_since(&self, _email: &str, _since: DateTime<Utc>) -> Result<u64, StorageError> {
        Err(backend_down())
    }

    async fn most_recent_issued_at(&self, _email: &str) -> Result<Option<DateTime<Utc>>, StorageError> {
        Err(backend_down())
    }

    async fn find_consumable(
        &self,
        _email: &str,
        _code: &str,
        _now: DateTime<Utc>,
    ) -> Result<Option<Uuid>, StorageError> {
        Err(backend_down())
    }

    async fn mark_used(&self, _id: Uuid, _now: DateTime<Utc>) -> Result<bool, StorageError> {
        Err(backend_down())
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<VerificationCode>, StorageError> {
        Err(backend_down())
    }
}

// Store that reads fine but whose inserts fail
#[derive(Default)]
pub struct InsertFailingRepository {
    pub inner: InMemoryVerificationCodeRepository,
}

#[async_trait]
impl VerificationCodeRepository for InsertFailingRepository {
    async fn insert(&self, _record: &VerificationCode) -> Result<(), StorageError> {
        Err(backend_down())
    }

    async fn count_issued_since(&self, email: &str, since: DateTime<Utc>) -> Result<u64, StorageError> {
        self.inner.count_issued_since(email, since).await
    }

    async fn most_recent_issued_at(&self, email: &str) -> Result<Option<DateTime<Utc>>, StorageError> {
        self.inner.most_recent_issued_at(email).await
    }

    async fn find_consumable(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>, StorageError> {
        self.inner.find_consumable(email, code, now).await
    }

    async fn mark_used(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, StorageError> {
        self.inner.mark_used(id, now).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationCode>, StorageError> {
        self.inner.find_by_id(id).await
    }
}

// Store where every call takes `delay` before reaching the in-memory data
pub struct SlowRepository {
    pub inner: InMemoryVerificationCodeRepository,
    pub delay: StdDuration,
}

impl SlowRepository {
    pub fn new(delay: StdDuration) -> Self {
        Self {
            inner: InMemoryVerificationCodeRepository::new(),
            delay,
        }
    }
}

#[async_trait]
impl VerificationCodeRepository for SlowRepository {
    async fn insert(&self, record: &VerificationCode) -> Result<(), StorageError> {
        tokio::time::sleep(self.delay).await;
        self.inner.insert(record).await
    }

    async fn count_issued_since(&self, email: &str, since: DateTime<Utc>) -> Result<u64, StorageError> {
        tokio::time::sleep(self.delay).await;
        self.inner.count_issued_since(email, since).await
    }

    async fn most_recent_issued_at(&self, email: &str) -> Result<Option<DateTime<Utc>>, StorageError> {
        tokio::time::sleep(self.delay).await;
        self.inner.most_recent_issued_at(email).await
    }

    async fn find_consumable(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>, StorageError> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_consumable(email, code, now).await
    }

    async fn mark_used(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, StorageError> {
        tokio::time::sleep(self.delay).await;
        self.inner.mark_used(id, now).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationCode>, StorageError> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_by_id(id).await
    }
}

// Store where a competing consumer always wins between lookup and update
#[derive(Default)]
pub struct RacingRepository {
    pub inner: Arc<InMemoryVerificationCodeRepository>,
}

#[async_trait]
impl VerificationCodeRepository for RacingRepository {
    async fn insert(&self, record: &VerificationCode) -> Result<(), StorageError> {
        self.inner.insert(record).await
    }

    async fn count_issued_since(&self, email: &str, since: DateTime<Utc>) -> Result<u64, StorageError> {
        self.inner.count_issued_since(email, since).await
    }

    async fn most_recent_issued_at(&self, email: &str) -> Result<Option<DateTime<Utc>>, StorageError> {
        self.inner.most_recent_issued_at(email).await
    }

    async fn find_consumable(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>, StorageError> {
        let found = self.inner.find_consumable(email, code, now).await?;
        if let Some(id) = found {
            // the other request consumes it first
            self.inner.mark_used(id, now).await?;
        }
        Ok(found)
    }

    async fn mark_used(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, StorageError> {
        self.inner.mark_used(id, now).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationCode>, StorageError> {
        self.inner.find_by_id(id).await
    }
}
