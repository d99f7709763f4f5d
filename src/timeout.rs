//! Timeout utilities for bounding remote lookups.
//!
//! The environment lookup is bounded so a stalled IP-echo service cannot hold
//! the pipeline. Remote submission is not wrapped; it relies on the transport.

use crate::error::{ForensizerError, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for the public IP lookup in seconds
pub const DEFAULT_LOOKUP_TIMEOUT_SECONDS: u64 = 5;

/// Timeout configuration for a single operation
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Maximum duration for the operation
    pub duration: Duration,
    /// Whether to log timeout warnings
    pub log_warnings: bool,
    /// Operation name for logging
    pub operation_name: String,
}

impl TimeoutConfig {
    /// Create a new timeout configuration
    pub fn new(seconds: u64, operation: impl Into<String>) -> Self {
        Self {
            duration: Duration::from_secs(seconds),
            log_warnings: true,
            operation_name: operation.into(),
        }
    }

    /// Create a timeout configuration with millisecond precision
    pub fn from_millis(millis: u64, operation: impl Into<String>) -> Self {
        Self {
            duration: Duration::from_millis(millis),
            log_warnings: true,
            operation_name: operation.into(),
        }
    }
}

/// Execute an async operation with a timeout
pub async fn with_timeout<T, F>(config: TimeoutConfig, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    debug!(
        "Starting operation '{}' with timeout of {}ms",
        config.operation_name,
        config.duration.as_millis()
    );

    match tokio::time::timeout(config.duration, future).await {
        Ok(result) => result,
        Err(_) => {
            if config.log_warnings {
                warn!(
                    "Operation '{}' timed out after {}ms",
                    config.operation_name,
                    config.duration.as_millis()
                );
            }

            Err(ForensizerError::Timeout {
                millis: u64::try_from(config.duration.as_millis()).unwrap_or(u64::MAX),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_async_timeout_success() {
        let config = TimeoutConfig::new(1, "test_operation");

        let result = with_timeout(config, async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok(42)
        })
        .await;

        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_async_timeout_failure() {
        let config = TimeoutConfig::from_millis(20, "test_operation");

        let result: Result<i32> = with_timeout(config, async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(42)
        })
        .await;

        assert!(matches!(result, Err(ForensizerError::Timeout { millis: 20 })));
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let config = TimeoutConfig::new(1, "failing_operation");
        let result: Result<i32> =
            with_timeout(config, async { Err(ForensizerError::Remote("refused".into())) }).await;
        assert!(matches!(result, Err(ForensizerError::Remote(_))));
    }
}
