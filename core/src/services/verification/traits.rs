//! Traits for notifier integration

use async_trait::async_trait;

/// Trait for delivering issued codes to their recipient
///
/// Delivery is decoupled from issuance: a failure here never un-issues a code.
#[async_trait]
pub trait EmailNotifierTrait: Send + Sync {
    /// Send a verification code by email, returning the provider message ID
    async fn send_verification_code(
        &self,
        email: &str,
        code: &str,
        expire_minutes: i64,
    ) -> Result<String, String>;

    /// Name of the delivery provider, for logs
    fn provider_name(&self) -> &str {
        "custom"
    }
}
