//! MySQL-specific database implementations
//!
//! This module contains MySQL implementations of repository traits
//! using SQLx for database operations.

pub mod verification_code_repository_impl;

// Re-export the MySQL implementations
pub use verification_code_repository_impl::MySqlVerificationCodeRepository;
