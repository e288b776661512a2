//! Rate-limited verification code issuance

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::verification_code::VerificationCode;
use crate::domain::value_objects::EmailAddress;
use crate::errors::IssueError;
use crate::repositories::VerificationCodeRepository;

use super::config::VerificationServiceConfig;
use super::timeout::with_store_timeout;

/// Decides whether a code may be issued for an address and, if so,
/// generates and persists it
pub struct CodeIssuer<R> {
    repository: Arc<R>,
    config: VerificationServiceConfig,
}

impl<R: VerificationCodeRepository> CodeIssuer<R> {
    pub fn new(repository: Arc<R>, config: VerificationServiceConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    /// Issue a new code for `email` at `now`
    ///
    /// This method:
    /// 1. Normalizes and validates the address
    /// 2. Rejects the request if the daily quota is used up
    /// 3. Rejects the request if the resend cooldown has not elapsed
    /// 4. Generates a random 6-digit code and persists it
    ///
    /// Earlier codes for the same address are left untouched and stay
    /// consumable until they expire.
    ///
    /// # Returns
    ///
    /// * `Ok(VerificationCode)` - The persisted record, including the plaintext code
    /// * `Err(IssueError)` - Policy rejection or storage failure; nothing was issued
    pub async fn issue(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<VerificationCode, IssueError> {
        let email = EmailAddress::parse(email).ok_or_else(|| {
            tracing::warn!(event = "invalid_email", "Rejected code request for malformed email");
            IssueError::InvalidEmail
        })?;

        let day_start = self.config.day_start(now);
        let issued_today = with_store_timeout(
            "count_issued_since",
            self.config.store_timeout,
            self.repository.count_issued_since(email.as_str(), day_start),
        )
        .await?;

        if issued_today >= u64::from(self.config.max_daily_codes) {
            tracing::warn!(
                email = %email.masked(),
                issued_today = issued_today,
                limit = self.config.max_daily_codes,
                event = "daily_quota_exceeded",
                "Verification code daily quota exceeded"
            );
            return Err(IssueError::QuotaExceeded {
                limit: self.config.max_daily_codes,
            });
        }

        let last_issued_at = with_store_timeout(
            "most_recent_issued_at",
            self.config.store_timeout,
            self.repository.most_recent_issued_at(email.as_str()),
        )
        .await?;

        if let Some(last) = last_issued_at {
            let cooldown = self.config.resend_cooldown();
            let elapsed = now - last;
            if elapsed < cooldown {
                let retry_after_seconds = ceil_seconds(cooldown - elapsed);
                tracing::warn!(
                    email = %email.masked(),
                    retry_after_seconds = retry_after_seconds,
                    event = "rate_limit_exceeded",
                    "Verification code request within resend cooldown"
                );
                return Err(IssueError::TooFrequent { retry_after_seconds });
            }
        }

        let record = VerificationCode::issue(&email, now, self.config.code_expiration());

        with_store_timeout(
            "insert",
            self.config.store_timeout,
            self.repository.insert(&record),
        )
        .await
        .map_err(|e| {
            tracing::error!(
                email = %email.masked(),
                error = %e,
                event = "code_storage_failed",
                "Failed to store verification code"
            );
            e
        })?;

        tracing::info!(
            email = %email.masked(),
            code_id = %record.id,
            expires_at = %record.expires_at,
            event = "code_issued",
            "Issued new verification code"
        );

        Ok(record)
    }
}

/// Whole seconds, rounded up, never below one
fn ceil_seconds(remaining: Duration) -> i64 {
    let millis = remaining.num_milliseconds();
    ((millis + 999) / 1000).max(1)
}
