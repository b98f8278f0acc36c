//! Polling with exponential backoff
//!
//! Listings lag writes on the platform. Rather than sleeping a fixed time
//! after a write, callers poll until the listing reflects it.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::observability::{log_event_with_fields, Event};

use super::errors::{ClientError, ClientResult};

/// Backoff schedule for polling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the second attempt
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Attempts before giving up, including the first
    pub max_attempts: u32,
    /// Randomize each delay within [delay/2, delay]
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            max_attempts: 10,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Delay after the given zero-based failed attempt, before jitter
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.min(31)).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }

    fn delay(&self, attempt: u32) -> Duration {
        let base = self.base_delay(attempt);
        if !self.jitter || base.is_zero() {
            return base;
        }
        let half = base / 2;
        let spread = (base - half).as_micros() as u64;
        half + Duration::from_micros(rand::thread_rng().gen_range(0..=spread))
    }
}

/// Polls `check` until it yields a value.
///
/// `check` returns `Ok(Some(value))` when the condition holds and `Ok(None)`
/// when it should be retried. Errors end polling immediately.
///
/// # Errors
///
/// `PollTimeout` once `max_attempts` checks returned `None`.
pub async fn poll_until<T, F, Fut>(policy: &RetryPolicy, mut check: F) -> ClientResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ClientResult<Option<T>>>,
{
    let attempts = policy.max_attempts.max(1);

    for attempt in 0..attempts {
        if let Some(value) = check().await? {
            let used = (attempt + 1).to_string();
            log_event_with_fields(Event::PollSatisfied, &[("attempts", &used)]);
            return Ok(value);
        }
        if attempt + 1 < attempts {
            let delay = policy.delay(attempt);
            let attempt_str = (attempt + 1).to_string();
            let delay_ms = delay.as_millis().to_string();
            log_event_with_fields(
                Event::PollRetry,
                &[("attempt", &attempt_str), ("delay_ms", &delay_ms)],
            );
            tokio::time::sleep(delay).await;
        }
    }

    let attempts_str = attempts.to_string();
    log_event_with_fields(Event::PollTimeout, &[("attempts", &attempts_str)]);
    Err(ClientError::PollTimeout { attempts })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            max_attempts,
            jitter: false,
        }
    }

    #[test]
    fn test_base_delay_doubles_and_caps() {
        let policy = RetryPolicy {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(1000),
            max_attempts: 10,
            jitter: false,
        };
        assert_eq!(policy.base_delay(0), Duration::from_millis(100));
        assert_eq!(policy.base_delay(1), Duration::from_millis(200));
        assert_eq!(policy.base_delay(3), Duration::from_millis(800));
        assert_eq!(policy.base_delay(4), Duration::from_millis(1000));
        assert_eq!(policy.base_delay(200), Duration::from_millis(1000));
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let policy = RetryPolicy {
            jitter: true,
            ..RetryPolicy::default()
        };
        for attempt in 0..6 {
            let base = policy.base_delay(attempt);
            let delay = policy.delay(attempt);
            assert!(delay <= base);
            assert!(delay >= base / 2);
        }
    }

    #[tokio::test]
    async fn test_first_attempt_success() {
        let result = poll_until(&fast(3), || async { Ok(Some(7)) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_succeeds_after_retries() {
        let mut calls = 0;
        let result = poll_until(&fast(5), || {
            calls += 1;
            let ready = calls >= 3;
            async move { Ok(ready.then_some("done")) }
        })
        .await;
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_times_out() {
        let mut calls = 0;
        let result: ClientResult<()> = poll_until(&fast(4), || {
            calls += 1;
            async { Ok(None) }
        })
        .await;
        assert!(matches!(result, Err(ClientError::PollTimeout { attempts: 4 })));
        assert_eq!(calls, 4);
    }

    #[tokio::test]
    async fn test_error_stops_polling() {
        let mut calls = 0;
        let result: ClientResult<()> = poll_until(&fast(4), || {
            calls += 1;
            async { Err(ClientError::Internal("boom".into())) }
        })
        .await;
        assert!(matches!(result, Err(ClientError::Internal(_))));
        assert_eq!(calls, 1);
    }
}
