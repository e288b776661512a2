//! Single-use verification code consumption

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::entities::verification_code::VerificationCode;
use crate::domain::value_objects::EmailAddress;
use crate::errors::ValidateError;
use crate::repositories::VerificationCodeRepository;

use super::config::VerificationServiceConfig;
use super::timeout::with_store_timeout;

/// Checks a submitted (email, code) pair and atomically consumes it
pub struct CodeValidator<R> {
    repository: Arc<R>,
    config: VerificationServiceConfig,
}

impl<R: VerificationCodeRepository> CodeValidator<R> {
    pub fn new(repository: Arc<R>, config: VerificationServiceConfig) -> Self {
        Self { repository, config }
    }

    /// Consume `submitted_code` for `email` at `now`
    ///
    /// The format check runs before any store access. Unknown, expired,
    /// already used and race-lost codes all yield `InvalidOrExpired`, so a
    /// caller cannot tell which one it hit.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - This call consumed the code
    /// * `Err(ValidateError)` - The code was rejected or the store failed
    pub async fn consume(
        &self,
        email: &str,
        submitted_code: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ValidateError> {
        let code = submitted_code.trim();
        if !VerificationCode::is_well_formed(code) {
            tracing::warn!(
                event = "invalid_code_format",
                code_length = code.len(),
                "Invalid verification code format provided"
            );
            return Err(ValidateError::MalformedCode);
        }

        let email = EmailAddress::normalized(email);

        let found = with_store_timeout(
            "find_consumable",
            self.config.store_timeout,
            self.repository.find_consumable(email.as_str(), code, now),
        )
        .await?;

        let Some(id) = found else {
            tracing::info!(
                email = %email.masked(),
                event = "code_rejected",
                "No consumable verification code matched"
            );
            return Err(ValidateError::InvalidOrExpired);
        };

        let consumed = with_store_timeout(
            "mark_used",
            self.config.store_timeout,
            self.repository.mark_used(id, now),
        )
        .await?;

        if !consumed {
            tracing::warn!(
                email = %email.masked(),
                code_id = %id,
                event = "consume_race_lost",
                "Verification code was consumed concurrently"
            );
            return Err(ValidateError::InvalidOrExpired);
        }

        tracing::info!(
            email = %email.masked(),
            code_id = %id,
            event = "code_consumed",
            "Verification code consumed"
        );

        Ok(())
    }
}
