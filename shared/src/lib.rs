//! Shared utilities and common types for the email verification server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and loading
//! - Email address utilities (normalization, validation, masking)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, ConfigError, DatabaseConfig, Environment, LogFormat, LoggingConfig,
    VerificationConfig,
};
pub use utils::email;
