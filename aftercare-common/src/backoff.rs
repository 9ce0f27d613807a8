//! Capped exponential backoff policy
//!
//! Soft-dependency connectors (the Redis cache, the SQLite pool) retry
//! through an explicit policy object instead of ad hoc attempt counters.
//! The delay schedule is a pure function of the policy, and waiting goes
//! through an injectable [`Clock`] so tests never sleep for real.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Sleep source for backoff waits
///
/// Production code uses [`TokioClock`]; tests inject a recording clock
/// that resolves immediately.
pub trait Clock: Send + Sync {
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// Real clock backed by `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Capped exponential backoff schedule
///
/// Attempt n (1-based) waits `initial * multiplier^(n-1)`, capped at
/// `max_delay`, before retrying; at most `max_attempts` attempts run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    pub initial: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub max_attempts: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
            multiplier: 2.0,
            max_attempts: 3,
        }
    }
}

impl BackoffPolicy {
    /// Delay before retry `attempt` (1-based; the wait after attempt n fails)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.powi(attempt.saturating_sub(1) as i32);
        let delay = self.initial.mul_f64(factor);
        delay.min(self.max_delay)
    }

    /// The full delay schedule: one entry per retry (`max_attempts - 1`)
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (1..self.max_attempts).map(|attempt| self.delay_for(attempt))
    }

    /// Run `operation` up to `max_attempts` times, sleeping on the given
    /// clock between attempts. Returns the first success or the last error.
    pub async fn retry<C, F, Fut, T, E>(
        &self,
        clock: &C,
        operation_name: &str,
        mut operation: F,
    ) -> Result<T, E>
    where
        C: Clock,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::debug!(
                            operation = operation_name,
                            attempt,
                            "Operation succeeded after retry"
                        );
                    }
                    return Ok(value);
                }
                Err(err) if attempt < self.max_attempts => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        operation = operation_name,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Operation failed, retrying"
                    );
                    clock.sleep(delay).await;
                }
                Err(err) => {
                    tracing::warn!(
                        operation = operation_name,
                        attempt,
                        error = %err,
                        "Operation failed, giving up"
                    );
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Clock that records requested sleeps and resolves immediately
    #[derive(Default)]
    struct RecordingClock {
        sleeps: Mutex<Vec<Duration>>,
    }

    impl Clock for RecordingClock {
        fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
            self.sleeps.lock().unwrap().push(duration);
            Box::pin(std::future::ready(()))
        }
    }

    #[test]
    fn delay_schedule_doubles_and_caps() {
        let policy = BackoffPolicy {
            initial: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
            multiplier: 2.0,
            max_attempts: 5,
        };
        let delays: Vec<_> = policy.delays().collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(100),
                Duration::from_millis(200),
                Duration::from_millis(400),
                Duration::from_millis(500), // capped
            ]
        );
    }

    #[test]
    fn single_attempt_policy_has_no_delays() {
        let policy = BackoffPolicy {
            max_attempts: 1,
            ..BackoffPolicy::default()
        };
        assert_eq!(policy.delays().count(), 0);
    }

    #[tokio::test]
    async fn retry_returns_first_success() {
        let clock = RecordingClock::default();
        let policy = BackoffPolicy::default();

        let result: Result<u32, String> = policy.retry(&clock, "test", || async { Ok(42) }).await;
        assert_eq!(result.unwrap(), 42);
        assert!(clock.sleeps.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn retry_sleeps_between_attempts_then_gives_up() {
        let clock = RecordingClock::default();
        let policy = BackoffPolicy {
            initial: Duration::from_millis(10),
            max_delay: Duration::from_millis(40),
            multiplier: 2.0,
            max_attempts: 3,
        };

        let result: Result<u32, String> = policy
            .retry(&clock, "test", || async { Err("nope".to_string()) })
            .await;
        assert!(result.is_err());

        let sleeps = clock.sleeps.lock().unwrap();
        assert_eq!(
            *sleeps,
            vec![Duration::from_millis(10), Duration::from_millis(20)]
        );
    }

    #[tokio::test]
    async fn retry_recovers_after_transient_failures() {
        let clock = RecordingClock::default();
        let policy = BackoffPolicy::default();
        let calls = Mutex::new(0u32);

        let result: Result<&str, String> = policy
            .retry(&clock, "test", || async {
                let mut calls = calls.lock().unwrap();
                *calls += 1;
                if *calls < 3 {
                    Err("transient".to_string())
                } else {
                    Ok("connected")
                }
            })
            .await;

        assert_eq!(result.unwrap(), "connected");
        assert_eq!(clock.sleeps.lock().unwrap().len(), 2);
    }
}
