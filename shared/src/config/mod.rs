//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `verification` - Verification code lifetime and issuance throttling

pub mod database;
pub mod environment;
pub mod verification;

use std::path::Path;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use ::config::ConfigError;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use verification::VerificationConfig;

/// Prefix for environment variables read by [`AppConfig::load`]
/// (e.g. `EV__DATABASE__URL`, `EV__VERIFICATION__MAX_DAILY_CODES`).
pub const ENV_PREFIX: &str = "EV";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Verification code policy
    pub verification: VerificationConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            database: DatabaseConfig::default(),
            verification: VerificationConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig::new("mysql://localhost:3306/email_verification_dev"),
            verification: VerificationConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig::new("mysql://prod-db:3306/email_verification")
                .with_max_connections(50),
            verification: VerificationConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Load configuration from plain environment variables
    /// (`DATABASE_URL`, `VERIFICATION_*`, `LOG_LEVEL`, ...)
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        let mut config = match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => {
                let mut config = Self::development();
                config.environment = Environment::Staging;
                config.logging = LoggingConfig::for_environment(Environment::Staging);
                config
            }
        };

        if std::env::var("DATABASE_URL").is_ok() {
            config.database = DatabaseConfig::from_env();
        }
        config.verification = VerificationConfig::from_env();
        config.logging = config.logging.with_env_overrides();
        config
    }

    /// Load layered configuration: an optional TOML file, then
    /// `EV__`-prefixed environment variables on top of it.
    ///
    /// Fields missing from both sources keep their defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(false));
        }

        builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_development_logging() {
        let config = AppConfig::default();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.verification.max_daily_codes, 10);
    }

    #[test]
    fn test_production_config() {
        let config = AppConfig::production();
        assert!(config.environment.is_production());
        assert_eq!(config.database.max_connections, 50);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_without_sources_falls_back_to_defaults() {
        let config = AppConfig::load(Some(Path::new("does-not-exist.toml"))).unwrap();
        assert_eq!(config.verification.code_expiration_minutes, 5);
        assert_eq!(config.verification.resend_cooldown_seconds, 60);
    }

    #[test]
    fn test_partial_deserialization_keeps_defaults() {
        let json = r#"{ "verification": { "max_daily_codes": 3 } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.verification.max_daily_codes, 3);
        assert_eq!(config.verification.resend_cooldown_seconds, 60);
        assert_eq!(config.database.max_connections, 10);
    }
}
