//! Verification service module for email-based registration codes
//!
//! This module provides the complete verification code workflow:
//! - Rate-limited issuance (daily quota and resend cooldown)
//! - Cryptographically random 6-digit code generation
//! - Expiry and atomic single-use consumption
//! - Hand-off of issued codes to an email notifier

mod clock;
mod config;
mod issuer;
mod service;
mod timeout;
mod traits;
mod types;
mod validator;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::VerificationServiceConfig;
pub use issuer::CodeIssuer;
pub use service::EmailVerificationService;
pub use traits::EmailNotifierTrait;
pub use types::{DeliveryOutcome, SendCodeResult};
pub use validator::CodeValidator;
