//! Code store trait defining the interface for verification code persistence.
//!
//! The store is the single source of truth for issuance history and code
//! state. Quota and cooldown decisions are derived from it on every call,
//! so several service instances can share one store without any in-process
//! coordination.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::verification_code::VerificationCode;
use crate::errors::StorageError;

/// Repository trait for verification code persistence operations
///
/// All `email` arguments are expected in normalized form.
///
/// # Example
/// ```no_run
/// # use chrono::Utc;
/// # use ev_core::repositories::VerificationCodeRepository;
/// # async fn example(repo: &impl VerificationCodeRepository) -> Result<(), Box<dyn std::error::Error>> {
/// let now = Utc::now();
/// if let Some(id) = repo.find_consumable("user@example.com", "123456", now).await? {
///     if repo.mark_used(id, now).await? {
///         println!("code consumed");
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait VerificationCodeRepository: Send + Sync {
    /// Append a newly issued code
    async fn insert(&self, record: &VerificationCode) -> Result<(), StorageError>;

    /// Count codes issued for `email` with `created_at >= since`
    async fn count_issued_since(
        &self,
        email: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, StorageError>;

    /// `created_at` of the latest code issued for `email`, if any
    async fn most_recent_issued_at(
        &self,
        email: &str,
    ) -> Result<Option<DateTime<Utc>>, StorageError>;

    /// Find a code for `email` equal to `code` that is unused and has
    /// `expires_at > now`
    ///
    /// # Returns
    /// * `Ok(Some(id))` - Handle of the most recently created matching record
    /// * `Ok(None)` - No consumable record matches
    async fn find_consumable(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>, StorageError>;

    /// Atomically set `used = true, used_at = now` if and only if the record
    /// is still unused at the moment of the update
    ///
    /// # Returns
    /// * `Ok(true)` - This call performed the transition
    /// * `Ok(false)` - The record was already used (or does not exist)
    async fn mark_used(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, StorageError>;

    /// Load a record by its identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationCode>, StorageError>;
}

