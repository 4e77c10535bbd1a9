//! Retry logic with exponential backoff for upstream requests.
//!
//! Only errors classified as [`ErrorRetryStrategy::Retry`] are retried; permanent
//! failures return on the first attempt. The clustering core itself never retries.

use std::{future::Future, time::Duration};

use dioxus_logger::tracing;

use crate::error::{retry::ErrorRetryStrategy, Error};

/// Context for executing upstream requests with automatic retry.
///
/// # Retry Behavior
///
/// - **Max attempts**: 3 (default)
/// - **Backoff strategy**: Exponential starting at 1 second (1s, 2s, 4s, ...)
/// - **Retry conditions**: Only errors with `ErrorRetryStrategy::Retry` are retried
///
/// # Example
///
/// ```ignore
/// let retry = RetryContext::new();
/// let system = retry
///     .execute_with_retry("system 30000142", || resolver.fetch_system(30000142))
///     .await?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RetryContext {
    /// Maximum number of attempts before giving up
    max_attempts: u32,
    /// Backoff before the first retry, doubled for every following one
    initial_backoff: Duration,
}

impl Default for RetryContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryContext {
    const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(1);

    /// Creates a retry context with 3 max attempts and 1 second initial backoff.
    pub fn new() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            initial_backoff: Self::DEFAULT_INITIAL_BACKOFF,
        }
    }

    /// Creates a retry context with custom limits.
    pub fn with_backoff(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
        }
    }

    /// Runs `operation` until it succeeds, fails permanently or runs out of attempts.
    ///
    /// # Arguments
    /// - `description` - Human-readable description for logging (e.g., "alliance 99000001")
    /// - `operation` - Produces a fresh future for every attempt
    ///
    /// # Returns
    /// - `Ok(R)` - Operation succeeded
    /// - `Err(Error)` - Operation failed permanently or exhausted all retry attempts
    pub async fn execute_with_retry<R, F, Fut>(
        &self,
        description: &str,
        mut operation: F,
    ) -> Result<R, Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, Error>>,
    {
        let mut attempt_count = 0;

        loop {
            tracing::debug!(
                "Requesting {} (attempt {}/{})",
                description,
                attempt_count + 1,
                self.max_attempts
            );

            let error = match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => e,
            };

            match error.to_retry_strategy() {
                ErrorRetryStrategy::Fail => {
                    tracing::debug!("Permanent error for {}: {}", description, error);
                    return Err(error);
                }
                ErrorRetryStrategy::Retry => {
                    attempt_count += 1;
                    if attempt_count >= self.max_attempts {
                        tracing::warn!(
                            "Max attempts ({}) exceeded for {}: {}",
                            self.max_attempts,
                            description,
                            error
                        );
                        return Err(error);
                    }

                    let backoff = self.initial_backoff * 2_u32.pow(attempt_count - 1);

                    tracing::warn!(
                        "Retrying {} (attempt {}/{}) after {:?}: {}",
                        description,
                        attempt_count + 1,
                        self.max_attempts,
                        backoff,
                        error
                    );

                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn transient() -> Error {
        Error::RedisError(fred::error::Error::new(
            fred::error::ErrorKind::IO,
            "connection reset",
        ))
    }

    #[tokio::test]
    async fn returns_first_success() {
        let retry = RetryContext::with_backoff(3, Duration::ZERO);
        let attempts = AtomicU32::new(0);
        let counter = &attempts;

        let result = retry
            .execute_with_retry("test", move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Error>(7)
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    /// Tests retrying transient errors.
    ///
    /// Expected: two transient failures followed by a success
    #[tokio::test]
    async fn retries_transient_errors() {
        let retry = RetryContext::with_backoff(3, Duration::ZERO);
        let attempts = AtomicU32::new(0);
        let counter = &attempts;

        let result = retry
            .execute_with_retry("test", move || async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(transient())
                } else {
                    Ok(1)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let retry = RetryContext::with_backoff(2, Duration::ZERO);
        let attempts = AtomicU32::new(0);
        let counter = &attempts;

        let result: Result<(), Error> = retry
            .execute_with_retry("test", move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(transient())
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    /// Permanent errors are returned without retrying.
    #[tokio::test]
    async fn does_not_retry_permanent_errors() {
        let retry = RetryContext::with_backoff(3, Duration::ZERO);
        let attempts = AtomicU32::new(0);
        let counter = &attempts;

        let result: Result<(), Error> = retry
            .execute_with_retry("test", move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(Error::ParseError("bad".to_string()))
            })
            .await;

        assert!(matches!(result, Err(Error::ParseError(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
