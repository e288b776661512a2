//! Email Notifier Module
//!
//! This module delivers issued verification codes by email. It includes a
//! Resend HTTP API notifier for production and a mock notifier for
//! development.
//!
//! ## Features
//!
//! - **Mock Implementation**: In-memory outbox for development and tests
//! - **Resend Support**: Production delivery via the Resend API
//! - **Templates**: Bilingual HTML and plain-text bodies
//! - **Security**: Recipient masking in logs, codes never logged

use std::sync::Arc;

use ev_core::services::verification::EmailNotifierTrait;

pub mod mock_email;
pub mod resend;
pub mod template;

pub use mock_email::{MockEmailNotifier, SentEmail};
pub use resend::{ResendConfig, ResendEmailNotifier};
pub use template::{render_verification_email, VerificationEmail};

#[cfg(test)]
mod tests;

/// Create an email notifier based on configuration
///
/// Returns the notifier for `config.provider` ("mock" or "resend").
/// Unknown providers and providers that cannot be built fall back to the
/// mock notifier with an error log.
pub fn create_email_notifier(config: &crate::config::NotifierConfig) -> Arc<dyn EmailNotifierTrait> {
    match config.provider.to_lowercase().as_str() {
        "mock" => Arc::new(MockEmailNotifier::new()),
        "resend" => match ResendConfig::from_notifier_config(config).and_then(ResendEmailNotifier::new) {
            Ok(notifier) => Arc::new(notifier),
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize Resend email notifier");
                tracing::warn!("Falling back to mock email notifier");
                Arc::new(MockEmailNotifier::new())
            }
        },
        other => {
            tracing::error!(provider = %other, "Unknown email provider");
            tracing::warn!("Falling back to mock email notifier");
            Arc::new(MockEmailNotifier::new())
        }
    }
}
