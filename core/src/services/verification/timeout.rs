//! Bounded store round-trips

use std::future::Future;
use std::time::Duration;

use crate::errors::StorageError;

/// Run one store operation, failing with `StorageError::Timeout` if it does
/// not complete within `limit`
pub(super) async fn with_store_timeout<T, F>(
    operation: &'static str,
    limit: Duration,
    fut: F,
) -> Result<T, StorageError>
where
    F: Future<Output = Result<T, StorageError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            let timeout_ms = limit.as_millis() as u64;
            tracing::error!(
                operation = operation,
                timeout_ms = timeout_ms,
                event = "store_timeout",
                "Verification code store operation timed out"
            );
            Err(StorageError::Timeout {
                operation,
                timeout_ms,
            })
        }
    }
}
