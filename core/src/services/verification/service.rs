//! Main verification service implementation

use std::sync::Arc;

use crate::errors::{IssueError, ValidateError};
use crate::repositories::VerificationCodeRepository;

use super::clock::{Clock, SystemClock};
use super::config::VerificationServiceConfig;
use super::issuer::CodeIssuer;
use super::traits::EmailNotifierTrait;
use super::types::{DeliveryOutcome, SendCodeResult};
use super::validator::CodeValidator;

/// Verification service for the registration flow
///
/// Reads the time from its clock, issues codes through [`CodeIssuer`],
/// hands them to the notifier and consumes submitted codes through
/// [`CodeValidator`].
pub struct EmailVerificationService<R, N: ?Sized> {
    /// Quota/cooldown-checked issuance
    issuer: CodeIssuer<R>,
    /// Atomic single-use consumption
    validator: CodeValidator<R>,
    /// Email delivery of issued codes
    notifier: Arc<N>,
    /// Authoritative time source
    clock: Arc<dyn Clock>,
}

impl<R, N> EmailVerificationService<R, N>
where
    R: VerificationCodeRepository,
    N: EmailNotifierTrait + ?Sized,
{
    /// Create a new verification service reading the system clock
    ///
    /// # Arguments
    ///
    /// * `repository` - Code store implementation
    /// * `notifier` - Email notifier implementation
    /// * `config` - Service configuration
    pub fn new(repository: Arc<R>, notifier: Arc<N>, config: VerificationServiceConfig) -> Self {
        Self::with_clock(repository, notifier, Arc::new(SystemClock), config)
    }

    /// Create a new verification service with an explicit clock
    pub fn with_clock(
        repository: Arc<R>,
        notifier: Arc<N>,
        clock: Arc<dyn Clock>,
        config: VerificationServiceConfig,
    ) -> Self {
        Self {
            issuer: CodeIssuer::new(repository.clone(), config.clone()),
            validator: CodeValidator::new(repository, config),
            notifier,
            clock,
        }
    }

    /// Issuer, for callers that supply `now` themselves
    pub fn issuer(&self) -> &CodeIssuer<R> {
        &self.issuer
    }

    /// Validator, for callers that supply `now` themselves
    pub fn validator(&self) -> &CodeValidator<R> {
        &self.validator
    }

    /// Issue a code for `email` and hand it to the notifier
    ///
    /// The code is persisted before delivery is attempted. A delivery failure
    /// is reported in [`SendCodeResult::delivery`] and never turns into an
    /// error: the code stays issued and counts against quota and cooldown.
    ///
    /// The call returns only after the notifier does, so its latency is
    /// bounded by the notifier's own retry policy (for the Resend notifier,
    /// up to three attempts of `request_timeout_secs` each plus backoff).
    pub async fn send_code(&self, email: &str) -> Result<SendCodeResult, IssueError> {
        let now = self.clock.now();
        let record = self.issuer.issue(email, now).await?;
        let config = self.issuer.config();

        let delivery = match self
            .notifier
            .send_verification_code(&record.email, &record.code, config.code_expiration().num_minutes())
            .await
        {
            Ok(message_id) => {
                tracing::debug!(
                    code_id = %record.id,
                    message_id = %message_id,
                    provider = self.notifier.provider_name(),
                    event = "code_delivered",
                    "Verification code handed to notifier"
                );
                DeliveryOutcome::Delivered { message_id }
            }
            Err(reason) => {
                tracing::warn!(
                    code_id = %record.id,
                    error = %reason,
                    provider = self.notifier.provider_name(),
                    event = "code_delivery_failed",
                    "Failed to send verification email (code remains issued)"
                );
                DeliveryOutcome::Failed { reason }
            }
        };

        Ok(SendCodeResult {
            email: record.email.clone(),
            code_id: record.id,
            expires_at: record.expires_at,
            expires_in_seconds: (record.expires_at - record.created_at).num_seconds(),
            next_resend_at: record.created_at + config.resend_cooldown(),
            delivery,
        })
    }

    /// Consume a submitted code for `email` at the clock's current time
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<(), ValidateError> {
        let now = self.clock.now();
        self.validator.consume(email, code, now).await
    }
}
