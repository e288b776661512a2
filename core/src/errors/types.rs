//! Error taxonomy for code issuance, validation and storage
//!
//! Messages are bilingual (English | Chinese) and never contain a
//! plaintext verification code.

use thiserror::Error;

/// Failures of the persistence backend behind the code store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage backend failure: {message} | 存储服务异常: {message}")]
    Backend { message: String },

    #[error("Storage operation timed out: {operation} after {timeout_ms}ms | 存储操作超时: {operation}")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    #[error("Corrupt verification code record: {message} | 验证码记录损坏: {message}")]
    CorruptRecord { message: String },
}

impl StorageError {
    /// Build a backend error from any displayable source
    pub fn backend(err: impl std::fmt::Display) -> Self {
        StorageError::Backend {
            message: err.to_string(),
        }
    }

    /// Stable error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::Backend { .. } => "STORAGE_ERROR",
            StorageError::Timeout { .. } => "STORAGE_TIMEOUT",
            StorageError::CorruptRecord { .. } => "STORAGE_CORRUPT_RECORD",
        }
    }
}

/// Reasons a verification code could not be issued
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IssueError {
    #[error("Invalid email address format | 邮箱地址格式不正确")]
    InvalidEmail,

    #[error("Daily verification code limit of {limit} reached | 今日发送次数已达上限 ({limit})")]
    QuotaExceeded { limit: u32 },

    #[error("Please wait {retry_after_seconds} seconds before requesting a new code | 发送过于频繁，请{retry_after_seconds}秒后再试")]
    TooFrequent { retry_after_seconds: i64 },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl IssueError {
    /// Stable error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            IssueError::InvalidEmail => "INVALID_EMAIL",
            IssueError::QuotaExceeded { .. } => "DAILY_QUOTA_EXCEEDED",
            IssueError::TooFrequent { .. } => "RESEND_TOO_FREQUENT",
            IssueError::Storage(e) => e.error_code(),
        }
    }

    /// Only backend failures are worth retrying, and only with backoff
    pub fn is_retryable(&self) -> bool {
        matches!(self, IssueError::Storage(_))
    }
}

/// Reasons a submitted code was not accepted
///
/// `InvalidOrExpired` deliberately covers unknown, expired, already used and
/// race-lost codes alike.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidateError {
    #[error("Verification code must be 6 digits | 验证码必须为6位数字")]
    MalformedCode,

    #[error("Invalid or expired verification code | 验证码错误或已过期")]
    InvalidOrExpired,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ValidateError {
    /// Stable error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidateError::MalformedCode => "MALFORMED_CODE",
            ValidateError::InvalidOrExpired => "INVALID_OR_EXPIRED_CODE",
            ValidateError::Storage(e) => e.error_code(),
        }
    }

    /// Only backend failures are worth retrying, and only with backoff
    pub fn is_retryable(&self) -> bool {
        matches!(self, ValidateError::Storage(_))
    }
}
