//! Mock Email Notifier Implementation
//!
//! A mock implementation of the email notifier for development and testing.
//! Deliveries are kept in memory instead of being sent.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use ev_core::services::verification::EmailNotifierTrait;
use ev_shared::utils::email::{is_valid_email, mask_email};

use super::template::{render_verification_email, VerificationEmail};

/// One message accepted by the mock notifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub message_id: String,
    pub to: String,
    pub code: String,
    pub expire_minutes: i64,
    pub rendered: VerificationEmail,
}

/// Mock email notifier for development and testing
///
/// This implementation:
/// - Validates recipient addresses
/// - Generates mock message IDs
/// - Records every accepted message for inspection
/// - Can simulate provider failures
#[derive(Clone, Default)]
pub struct MockEmailNotifier {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Accepted messages, oldest first
    outbox: Arc<Mutex<Vec<SentEmail>>>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
}

impl MockEmailNotifier {
    /// Create a new mock email notifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock notifier that fails every delivery
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Messages accepted so far
    pub fn sent(&self) -> Vec<SentEmail> {
        self.outbox
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Most recent code delivered to `email`
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.outbox
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .rev()
            .find(|m| m.to == email)
            .map(|m| m.code.clone())
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&mut self, simulate: bool) {
        self.simulate_failure = simulate;
    }
}

#[async_trait]
impl EmailNotifierTrait for MockEmailNotifier {
    async fn send_verification_code(
        &self,
        email: &str,
        code: &str,
        expire_minutes: i64,
    ) -> Result<String, String> {
        let masked = mask_email(email);

        if !is_valid_email(email) {
            return Err(format!("Invalid email address: {}", masked));
        }

        if self.simulate_failure {
            warn!(
                provider = "mock",
                email = %masked,
                "Mock email notifier simulating failure"
            );
            return Err("Simulated email sending failure".to_string());
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        self.outbox
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SentEmail {
                message_id: message_id.clone(),
                to: email.to_string(),
                code: code.to_string(),
                expire_minutes,
                rendered: render_verification_email(code, expire_minutes),
            });

        info!(
            target: "email_service",
            provider = "mock",
            email = %masked,
            message_id = %message_id,
            message_number = count,
            "Verification email sent (mock)"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}
