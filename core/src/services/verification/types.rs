//! Types for verification service results

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// What happened when the issued code was handed to the notifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// The notifier accepted the message
    Delivered { message_id: String },
    /// The notifier failed; the code is still issued and consumable
    Failed { reason: String },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

/// Result of sending a verification code
///
/// Deliberately carries no plaintext code.
#[derive(Debug, Clone, Serialize)]
pub struct SendCodeResult {
    /// Normalized address the code was issued for
    pub email: String,
    /// Identifier of the stored code record
    pub code_id: Uuid,
    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,
    /// Lifetime of the code in seconds
    pub expires_in_seconds: i64,
    /// When the address may request another code
    pub next_resend_at: DateTime<Utc>,
    /// Notifier outcome
    pub delivery: DeliveryOutcome,
}
