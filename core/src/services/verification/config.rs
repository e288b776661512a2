//! Configuration for the verification service

use chrono::{DateTime, Duration, FixedOffset, Offset, TimeZone, Utc};

use ev_shared::config::verification::{MAX_CODE_EXPIRATION_MINUTES, MAX_RESEND_COOLDOWN_SECONDS};
use ev_shared::config::VerificationConfig;

use crate::domain::entities::verification_code::DEFAULT_EXPIRATION_MINUTES;

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Number of minutes before a verification code expires
    pub code_expiration_minutes: i64,
    /// Minimum seconds between code issuances for one address
    pub resend_cooldown_seconds: i64,
    /// Maximum codes issued per address per calendar day
    pub max_daily_codes: u32,
    /// Time zone whose midnight starts a new quota day
    pub day_boundary: FixedOffset,
    /// Upper bound for each store round-trip
    pub store_timeout: std::time::Duration,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            code_expiration_minutes: DEFAULT_EXPIRATION_MINUTES,
            max_daily_codes: 10,
            resend_cooldown_seconds: 60,
            day_boundary: Utc.fix(),
            store_timeout: std::time::Duration::from_secs(3),
        }
    }
}

impl From<&VerificationConfig> for VerificationServiceConfig {
    fn from(config: &VerificationConfig) -> Self {
        let offset_seconds = config.day_boundary_utc_offset_minutes.saturating_mul(60);
        let day_boundary = FixedOffset::east_opt(offset_seconds).unwrap_or_else(|| {
            tracing::warn!(
                offset_minutes = config.day_boundary_utc_offset_minutes,
                "Day boundary offset out of range, using UTC"
            );
            Utc.fix()
        });

        let code_expiration_minutes = config
            .code_expiration_minutes
            .clamp(1, MAX_CODE_EXPIRATION_MINUTES);
        if code_expiration_minutes != config.code_expiration_minutes {
            tracing::warn!(
                configured = config.code_expiration_minutes,
                effective = code_expiration_minutes,
                "Code expiration out of range, clamped"
            );
        }

        let resend_cooldown_seconds = config
            .resend_cooldown_seconds
            .clamp(0, MAX_RESEND_COOLDOWN_SECONDS);
        if resend_cooldown_seconds != config.resend_cooldown_seconds {
            tracing::warn!(
                configured = config.resend_cooldown_seconds,
                effective = resend_cooldown_seconds,
                "Resend cooldown out of range, clamped"
            );
        }

        Self {
            code_expiration_minutes,
            resend_cooldown_seconds,
            max_daily_codes: config.max_daily_codes,
            day_boundary,
            store_timeout: std::time::Duration::from_millis(config.store_timeout_ms),
        }
    }
}

impl VerificationServiceConfig {
    /// Lifetime of an issued code, bounded to `1..=MAX_CODE_EXPIRATION_MINUTES`
    pub fn code_expiration(&self) -> Duration {
        Duration::minutes(self.code_expiration_minutes.clamp(1, MAX_CODE_EXPIRATION_MINUTES))
    }

    /// Minimum interval between two issuances for one address,
    /// bounded to `0..=MAX_RESEND_COOLDOWN_SECONDS`
    pub fn resend_cooldown(&self) -> Duration {
        Duration::seconds(self.resend_cooldown_seconds.clamp(0, MAX_RESEND_COOLDOWN_SECONDS))
    }

    /// Start of the calendar day (in `day_boundary`'s zone) containing `now`
    pub fn day_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local_midnight = now
            .with_timezone(&self.day_boundary)
            .date_naive()
            .and_time(chrono::NaiveTime::default());
        let offset = Duration::seconds(i64::from(self.day_boundary.local_minus_utc()));
        Utc.from_utc_datetime(&(local_midnight - offset))
    }
}
