//! Verification code entity for email-based registration.

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::EmailAddress;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Smallest code ever issued
pub const CODE_MIN: u32 = 100_000;

/// Largest code ever issued
pub const CODE_MAX: u32 = 999_999;

/// Default expiration time for verification codes (5 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 5;

/// Lifecycle state of a code at a given instant
///
/// `Expired` is never stored; it is derived from `expires_at` at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeStatus {
    Unused,
    Used,
    Expired,
}

/// One issued verification code
///
/// Rows are append-only: the only mutation after creation is the single
/// `used = false -> true` transition, which also sets `used_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode {
    /// Opaque record identifier
    pub id: Uuid,

    /// Normalized address the code was issued for
    pub email: String,

    /// The 6-digit verification code
    pub code: String,

    /// Timestamp when the code was issued
    pub created_at: DateTime<Utc>,

    /// Timestamp when the code stops being consumable (`created_at + window`)
    pub expires_at: DateTime<Utc>,

    /// Whether the code has been consumed
    pub used: bool,

    /// When the code was consumed; set iff `used`
    pub used_at: Option<DateTime<Utc>>,
}

impl VerificationCode {
    /// Creates a new unused code for `email`, issued at `now`
    ///
    /// # Arguments
    ///
    /// * `email` - The normalized address the code is bound to
    /// * `now` - Issuance time, taken from the authoritative clock
    /// * `expiration` - Lifetime of the code
    pub fn issue(email: &EmailAddress, now: DateTime<Utc>, expiration: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.as_str().to_string(),
            code: Self::generate_code(),
            created_at: now,
            expires_at: now + expiration,
            used: false,
            used_at: None,
        }
    }

    /// Generates a uniformly random code in `100000..=999999` from the OS CSPRNG
    pub fn generate_code() -> String {
        let code: u32 = OsRng.gen_range(CODE_MIN..=CODE_MAX);
        format!("{:06}", code)
    }

    /// Checks that a submitted code has the shape of an issued one:
    /// exactly six ASCII digits
    pub fn is_well_formed(code: &str) -> bool {
        code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
    }

    /// Checks if the code has expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// A consumable code is both unused and unexpired
    pub fn is_consumable(&self, now: DateTime<Utc>) -> bool {
        !self.used && !self.is_expired(now)
    }

    /// Derived lifecycle state at `now`
    pub fn status(&self, now: DateTime<Utc>) -> CodeStatus {
        if self.used {
            CodeStatus::Used
        } else if self.is_expired(now) {
            CodeStatus::Expired
        } else {
            CodeStatus::Unused
        }
    }

    /// Gets the time remaining until expiration, or zero if expired
    pub fn time_until_expiration(&self, now: DateTime<Utc>) -> Duration {
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }

    /// Transitions the code to used
    ///
    /// Returns `false` without touching the record if it was already used.
    pub fn mark_used(&mut self, now: DateTime<Utc>) -> bool {
        if self.used {
            return false;
        }
        self.used = true;
        self.used_at = Some(now);
        true
    }
}
