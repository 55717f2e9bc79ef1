//! Bounded retry and rate-limit backoff for gateway calls.
//!
//! Transient failures (network, 5xx) back off exponentially. Primary rate
//! limits wait for the server-provided reset time, capped so a distant reset
//! cannot stall the run. Secondary rate limits are retried at most once with
//! a conservative fixed delay; retrying harder only amplifies GitHub's abuse
//! detection.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::github::error::ExportError;
use crate::github::rate_limit::RateLimitKind;

/// Retry policy applied to every gateway request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first call.
    max_attempts: u32,
    /// Base delay for exponential transient backoff.
    base_delay: Duration,
    /// Fixed delay applied to a secondary rate limit before its one retry.
    secondary_delay: Duration,
    /// Ceiling on how long a primary rate limit reset is waited out.
    max_primary_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            secondary_delay: Duration::from_secs(60),
            max_primary_wait: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with explicit bounds, mainly for tests.
    #[must_use]
    pub const fn new(
        max_attempts: u32,
        base_delay: Duration,
        secondary_delay: Duration,
        max_primary_wait: Duration,
    ) -> Self {
        Self {
            max_attempts,
            base_delay,
            secondary_delay,
            max_primary_wait,
        }
    }

    /// Runs `call` until it succeeds, returns a non-retryable error, or the
    /// attempt budget is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the final error once no further retry is permitted.
    pub(super) async fn execute<T, F, Fut>(
        &self,
        operation: &str,
        mut call: F,
    ) -> Result<T, ExportError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ExportError>>,
    {
        let mut attempt: u32 = 1;
        loop {
            let error = match call().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            let Some(delay) = self.retry_delay(&error, attempt) else {
                if error.is_retryable() {
                    warn!(
                        operation,
                        attempt,
                        error = %error,
                        "giving up after exhausting retries"
                    );
                }
                return Err(error);
            };

            warn!(
                operation,
                attempt,
                delay_secs = delay.as_secs(),
                error = %error,
                "retrying after transient failure"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Decides whether `error` earns another attempt and how long to wait.
    fn retry_delay(&self, error: &ExportError, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }

        match error {
            ExportError::Network { .. } | ExportError::Server { .. } => {
                Some(self.transient_delay(attempt))
            }
            ExportError::RateLimitExceeded {
                kind: RateLimitKind::Secondary,
                ..
            } => (attempt == 1).then_some(self.secondary_delay),
            ExportError::RateLimitExceeded {
                kind: RateLimitKind::Primary,
                rate_limit,
                ..
            } => {
                let wait = rate_limit.as_ref().map_or_else(
                    || self.transient_delay(attempt),
                    |info| Duration::from_secs(info.seconds_until_reset()),
                );
                Some(wait.min(self.max_primary_wait))
            }
            _ => None,
        }
    }

    fn transient_delay(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use crate::github::error::ExportError;
    use crate::github::rate_limit::{RateLimitInfo, RateLimitKind};

    use super::RetryPolicy;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(
            3,
            Duration::from_millis(10),
            Duration::from_millis(50),
            Duration::from_millis(100),
        )
    }

    fn network_error() -> ExportError {
        ExportError::Network {
            message: "connection reset".to_owned(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_from_transient_failures_within_budget() {
        let calls = AtomicU32::new(0);
        let result = fast_policy()
            .execute("review comments", || {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 2 {
                        Err(network_error())
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn fails_loudly_once_attempts_are_exhausted() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = fast_policy()
            .execute("review comments", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(network_error()) }
            })
            .await;

        assert!(matches!(result, Err(ExportError::Network { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn secondary_rate_limit_gets_a_single_retry() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = fast_policy()
            .execute("review threads", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(ExportError::RateLimitExceeded {
                        kind: RateLimitKind::Secondary,
                        rate_limit: None,
                        message: "secondary rate limit".to_owned(),
                    })
                }
            })
            .await;

        assert!(matches!(
            result,
            Err(ExportError::RateLimitExceeded { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn primary_rate_limit_waits_for_capped_reset() {
        let calls = AtomicU32::new(0);
        let result = fast_policy()
            .execute("issue comments", || {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt == 0 {
                        Err(ExportError::RateLimitExceeded {
                            kind: RateLimitKind::Primary,
                            rate_limit: Some(RateLimitInfo::new(5000, 0, u64::MAX)),
                            message: "quota exhausted".to_owned(),
                        })
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        // The u64::MAX reset would wait forever without the cap.
        assert_eq!(result, Ok(1));
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_errors_return_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = fast_policy()
            .execute("reviews", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(ExportError::Authentication {
                        message: "bad credentials".to_owned(),
                    })
                }
            })
            .await;

        assert!(matches!(result, Err(ExportError::Authentication { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
