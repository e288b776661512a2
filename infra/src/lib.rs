//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the email verification
//! engine. It provides the concrete implementations behind the seams that
//! `ev_core` defines.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL code store using SQLx, connection pool and migrations
//! - **Email**: Verification email notifiers (mock, Resend HTTP API)
//! - **Telemetry**: `tracing` subscriber initialisation
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

// Re-export core types for convenience
pub use ev_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Email module - Verification code delivery
pub mod email;

/// Telemetry module - Tracing subscriber setup
pub mod telemetry;

/// Configuration module for infrastructure services
pub mod config {
    //! Configuration management for infrastructure services
    //!
    //! Handles:
    //! - Application configuration (database, verification policy, logging)
    //! - Email notifier credentials

    use std::path::{Path, PathBuf};

    use ev_shared::config::{AppConfig, ConfigError, Environment, ENV_PREFIX};
    use serde::{Deserialize, Serialize};

    /// Infrastructure configuration settings
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct InfrastructureConfig {
        /// Application configuration shared with the core
        pub app: AppConfig,
        /// Email notifier configuration
        pub notifier: NotifierConfig,
    }

    /// Email notifier configuration
    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(default)]
    pub struct NotifierConfig {
        /// Notifier provider ("mock", "resend")
        pub provider: String,
        /// API key for the provider
        pub api_key: String,
        /// Sender address, e.g. `Acme <no-reply@acme.dev>`
        pub from_address: String,
        /// Base URL of the provider API
        pub api_base_url: String,
        /// Timeout for API requests in seconds
        pub request_timeout_secs: u64,
    }

    impl Default for NotifierConfig {
        fn default() -> Self {
            Self {
                provider: "mock".to_string(),
                api_key: String::new(),
                from_address: "no-reply@example.com".to_string(),
                api_base_url: crate::email::resend::DEFAULT_API_BASE_URL.to_string(),
                request_timeout_secs: 10,
            }
        }
    }

    impl NotifierConfig {
        /// Create configuration from environment variables
        pub fn from_env() -> Self {
            let defaults = Self::default();
            Self {
                provider: std::env::var("EMAIL_PROVIDER").unwrap_or(defaults.provider),
                api_key: std::env::var("EMAIL_API_KEY").unwrap_or_default(),
                from_address: std::env::var("EMAIL_FROM_ADDRESS").unwrap_or(defaults.from_address),
                api_base_url: std::env::var("EMAIL_API_BASE_URL").unwrap_or(defaults.api_base_url),
                request_timeout_secs: std::env::var("EMAIL_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.request_timeout_secs),
            }
        }
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct NotifierSection {
        notifier: NotifierConfig,
    }

    /// Pick the TOML file to load: `explicit` if given, otherwise the
    /// environment's `config.<env>.toml` under `base_dir` when it exists
    pub fn resolve_config_file(
        explicit: Option<&str>,
        environment: Environment,
        base_dir: &Path,
    ) -> Option<PathBuf> {
        if let Some(path) = explicit.filter(|p| !p.trim().is_empty()) {
            return Some(PathBuf::from(path));
        }
        let candidate = base_dir.join(environment.config_file());
        candidate.is_file().then_some(candidate)
    }

    impl InfrastructureConfig {
        /// Load configuration from plain environment variables
        pub fn from_env() -> Self {
            Self {
                app: AppConfig::from_env(),
                notifier: NotifierConfig::from_env(),
            }
        }

        /// Load layered configuration from an optional TOML file and
        /// `EV__`-prefixed environment variables
        ///
        /// The notifier is read from the `[notifier]` table
        /// (`EV__NOTIFIER__API_KEY`, ...).
        pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
            let app = AppConfig::load(path)?;

            let mut builder = ::config::Config::builder();
            if let Some(path) = path {
                builder = builder.add_source(::config::File::from(path).required(false));
            }
            let section: NotifierSection = builder
                .add_source(
                    ::config::Environment::with_prefix(ENV_PREFIX)
                        .prefix_separator("__")
                        .separator("__"),
                )
                .build()?
                .try_deserialize()?;

            Ok(Self {
                app,
                notifier: section.notifier,
            })
        }
    }
}

/// The verification service as wired by [`initialize`]
#[cfg(feature = "mysql")]
pub type WiredVerificationService = ev_core::services::verification::EmailVerificationService<
    database::MySqlVerificationCodeRepository,
    dyn ev_core::services::verification::EmailNotifierTrait,
>;

/// Initialize infrastructure services with async runtime
///
/// This function sets up:
/// - Configuration from `.env` and the process environment
/// - Tracing subscriber
/// - Database connection pool and migrations
/// - Email notifier
///
/// and returns the verification service built on top of them.
#[cfg(feature = "mysql")]
pub async fn initialize() -> Result<WiredVerificationService, InfrastructureError> {
    let config = load_config()?;
    initialize_with(config).await
}

/// Same as [`initialize`], with configuration supplied by the caller
#[cfg(feature = "mysql")]
pub async fn initialize_with(
    config: config::InfrastructureConfig,
) -> Result<WiredVerificationService, InfrastructureError> {
    telemetry::init_tracing(&config.app.logging);
    tracing::info!(
        environment = %config.app.environment,
        "Initializing infrastructure services..."
    );

    config
        .app
        .verification
        .validate()
        .map_err(InfrastructureError::Config)?;

    if config.app.environment.is_production() && config.notifier.provider.eq_ignore_ascii_case("mock") {
        tracing::warn!("Mock email notifier configured in production; codes will not be delivered");
    }

    let pool = database::DatabasePool::new(config.app.database.clone()).await?;
    if config.app.database.run_migrations {
        pool.run_migrations().await?;
    }

    let repository = std::sync::Arc::new(database::MySqlVerificationCodeRepository::new(
        pool.get_pool().clone(),
    ));
    let notifier = email::create_email_notifier(&config.notifier);
    let service_config =
        ev_core::services::verification::VerificationServiceConfig::from(&config.app.verification);

    tracing::info!("Infrastructure services initialized successfully");

    Ok(ev_core::services::verification::EmailVerificationService::new(
        repository,
        notifier,
        service_config,
    ))
}

/// Load infrastructure configuration from environment
#[cfg(feature = "mysql")]
fn load_config() -> Result<config::InfrastructureConfig, InfrastructureError> {
    dotenvy::dotenv().ok(); // Load .env file if present

    let environment = ev_shared::config::Environment::from_env();
    dotenvy::from_filename(environment.env_file()).ok();

    let explicit = std::env::var("EV_CONFIG_FILE").ok();
    match config::resolve_config_file(explicit.as_deref(), environment, std::path::Path::new(".")) {
        Some(path) => config::InfrastructureConfig::load(Some(&path))
            .map_err(|e| InfrastructureError::Config(e.to_string())),
        None => Ok(config::InfrastructureConfig::from_env()),
    }
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Email notifier error
    #[error("Email service error: {0}")]
    Email(String),
}

impl From<InfrastructureError> for StorageError {
    fn from(err: InfrastructureError) -> Self {
        StorageError::backend(err)
    }
}
