//! Bounded connect retry.
//!
//! The store may come up after the pipeline does (a database container
//! starting alongside it). Connection attempts are repeated at a fixed
//! interval; once they are exhausted the store is reported as
//! [`DatabaseError::Unavailable`] and the run aborts.

use std::future::Future;
use std::time::Duration;

use epi_config::DatabaseConfig;

use crate::error::DatabaseError;

/// Configuration for connection retry.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Pause between attempts.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            delay: Duration::from_secs(3),
        }
    }
}

impl From<&DatabaseConfig> for RetryConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            max_attempts: config.connect_attempts.max(1),
            delay: Duration::from_millis(config.connect_delay_ms),
        }
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// attempts run out.
///
/// # Errors
///
/// Returns the first non-retryable error unchanged, or
/// `DatabaseError::Unavailable` carrying the last retryable error.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, mut op: F) -> Result<T, DatabaseError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DatabaseError>>,
{
    let attempts = config.max_attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() => {
                tracing::warn!(attempt, max = attempts, error = %e, "database not ready");
                last_error = e.to_string();
                if attempt < attempts {
                    tokio::time::sleep(config.delay).await;
                }
            }
            Err(e) => return Err(e),
        }
    }

    Err(DatabaseError::Unavailable {
        attempts,
        last_error,
    })
}
