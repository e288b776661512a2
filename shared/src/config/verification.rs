//! Verification code policy configuration

use serde::{Deserialize, Serialize};

/// Largest accepted distance of the quota day boundary from UTC, in minutes
pub const MAX_UTC_OFFSET_MINUTES: i32 = 24 * 60 - 1;

/// Longest accepted code lifetime, in minutes
pub const MAX_CODE_EXPIRATION_MINUTES: i64 = 24 * 60;

/// Longest accepted resend cooldown, in seconds
pub const MAX_RESEND_COOLDOWN_SECONDS: i64 = 24 * 60 * 60;

/// Verification code lifetime and issuance throttling
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Minutes before an issued code expires
    pub code_expiration_minutes: i64,

    /// Minimum seconds between two issuances for the same address
    pub resend_cooldown_seconds: i64,

    /// Max codes issued per address per calendar day
    pub max_daily_codes: u32,

    /// UTC offset (minutes) of the time zone whose midnight resets the daily quota
    pub day_boundary_utc_offset_minutes: i32,

    /// Upper bound for a single store round-trip, in milliseconds
    pub store_timeout_ms: u64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_expiration_minutes: 5,
            resend_cooldown_seconds: 60,
            max_daily_codes: 10,
            day_boundary_utc_offset_minutes: 0,
            store_timeout_ms: 3000,
        }
    }
}

impl VerificationConfig {
    /// Create from environment variables, keeping defaults for anything unset
    /// or unparsable
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            code_expiration_minutes: env_or("VERIFICATION_CODE_EXPIRE_MINUTES", defaults.code_expiration_minutes),
            resend_cooldown_seconds: env_or("VERIFICATION_RESEND_COOLDOWN_SECONDS", defaults.resend_cooldown_seconds),
            max_daily_codes: env_or("VERIFICATION_MAX_DAILY_CODES", defaults.max_daily_codes),
            day_boundary_utc_offset_minutes: env_or(
                "VERIFICATION_DAY_BOUNDARY_UTC_OFFSET_MINUTES",
                defaults.day_boundary_utc_offset_minutes,
            ),
            store_timeout_ms: env_or("VERIFICATION_STORE_TIMEOUT_MS", defaults.store_timeout_ms),
        }
    }

    /// Check the values are usable
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_CODE_EXPIRATION_MINUTES).contains(&self.code_expiration_minutes) {
            return Err(format!(
                "code_expiration_minutes must be within 1..={}",
                MAX_CODE_EXPIRATION_MINUTES
            ));
        }
        if !(0..=MAX_RESEND_COOLDOWN_SECONDS).contains(&self.resend_cooldown_seconds) {
            return Err(format!(
                "resend_cooldown_seconds must be within 0..={}",
                MAX_RESEND_COOLDOWN_SECONDS
            ));
        }
        if self.max_daily_codes == 0 {
            return Err("max_daily_codes must be at least 1".to_string());
        }
        if !(-MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES)
            .contains(&self.day_boundary_utc_offset_minutes)
        {
            return Err(format!(
                "day_boundary_utc_offset_minutes must be within +/-{}",
                MAX_UTC_OFFSET_MINUTES
            ));
        }
        if self.store_timeout_ms == 0 {
            return Err("store_timeout_ms must be positive".to_string());
        }
        Ok(())
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
