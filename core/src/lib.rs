//! # Email Verification Core
//!
//! Core business logic and domain layer for email verification codes.
//! This crate contains the verification code entity, the code store
//! repository interface, the issuance and validation services, and the
//! error types that form the foundation of the application architecture.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod errors;

// Re-export commonly used types for convenience
pub use domain::*;
pub use services::*;
pub use repositories::*;
pub use errors::*;
