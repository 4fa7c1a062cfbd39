//! Circuit breaker (C3, spec §4.4), wrapping any upstream dependency that
//! can fail in bursts (DNS-over-HTTPS resolvers, RDAP servers). Grounded
//! on the closed/open/half-open state machine shape used throughout
//! kumomta's `throttle`/`dns-resolver` crates for guarding flaky upstreams.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use crate::config::CircuitBreakerConfig;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Closed,
    Open,
    HalfOpen,
}

struct Inner {
    state: State,
    opened_at: Option<Instant>,
}

/// One breaker per upstream dependency, identified by `name` for logging.
/// `call` classifies the outcome of the wrapped future: a timeout or
/// network error counts as a failure, a well-formed negative answer
/// (e.g. NXDOMAIN) does not, since that's the upstream working correctly.
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
    consecutive_failures: AtomicU32,
    consecutive_successes: AtomicU32,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(Inner {
                state: State::Closed,
                opened_at: None,
            }),
            consecutive_failures: AtomicU32::new(0),
            consecutive_successes: AtomicU32::new(0),
        }
    }

    pub fn state(&self) -> State {
        let mut inner = self.inner.lock();
        self.maybe_half_open(&mut inner);
        inner.state
    }

    fn maybe_half_open(&self, inner: &mut Inner) {
        if inner.state == State::Open {
            if let Some(opened_at) = inner.opened_at {
                if opened_at.elapsed() >= self.config.reset_timeout {
                    tracing::warn!(breaker = %self.name, "circuit breaker half-opening after reset timeout");
                    inner.state = State::HalfOpen;
                    inner.opened_at = None;
                    self.consecutive_successes.store(0, Ordering::Relaxed);
                }
            }
        }
    }

    /// Runs `f` if the breaker permits it, returning [`Error::CircuitOpen`]
    /// immediately otherwise. `is_failure` classifies the `Ok` result of
    /// `f` (so a well-formed negative upstream answer can still count as
    /// success); any `Err` from `f` is always a failure.
    pub async fn call<T, E, Fut>(
        &self,
        is_failure: impl FnOnce(&T) -> bool,
        f: impl FnOnce() -> Fut,
    ) -> Result<T, Error>
    where
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        {
            let mut inner = self.inner.lock();
            self.maybe_half_open(&mut inner);
            if inner.state == State::Open {
                return Err(Error::CircuitOpen(self.name.clone()));
            }
        }

        match f().await {
            Ok(value) => {
                if is_failure(&value) {
                    self.record_failure();
                } else {
                    self.record_success();
                }
                Ok(value)
            }
            Err(e) => {
                self.record_failure();
                Err(Error::TransientUpstream(e.to_string()))
            }
        }
    }

    pub fn record_success(&self) {
        self.consecutive_failures.store(0, Ordering::Relaxed);
        let mut inner = self.inner.lock();
        if inner.state == State::HalfOpen {
            let successes = self.consecutive_successes.fetch_add(1, Ordering::Relaxed) + 1;
            if successes >= self.config.success_threshold {
                tracing::debug!(breaker = %self.name, "circuit breaker closing");
                inner.state = State::Closed;
                inner.opened_at = None;
                self.consecutive_successes.store(0, Ordering::Relaxed);
            }
        }
    }

    pub fn record_failure(&self) {
        self.consecutive_successes.store(0, Ordering::Relaxed);
        let mut inner = self.inner.lock();
        if inner.state == State::HalfOpen {
            tracing::warn!(breaker = %self.name, "circuit breaker re-opening after half-open failure");
            inner.state = State::Open;
            inner.opened_at = Some(Instant::now());
            self.consecutive_failures.store(0, Ordering::Relaxed);
            return;
        }
        let failures = self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
        if failures >= self.config.failure_threshold && inner.state == State::Closed {
            tracing::warn!(breaker = %self.name, failures, "circuit breaker opening");
            inner.state = State::Open;
            inner.opened_at = Some(Instant::now());
            self.consecutive_failures.store(0, Ordering::Relaxed);
        }
    }

    #[cfg(test)]
    fn reset_timeout(&self) -> Duration {
        self.config.reset_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker(reset_timeout: Duration) -> CircuitBreaker {
        CircuitBreaker::new(
            "test",
            CircuitBreakerConfig {
                failure_threshold: 3,
                success_threshold: 2,
                reset_timeout,
            },
        )
    }

    #[test]
    fn opens_after_threshold_failures() {
        let breaker = breaker(Duration::from_secs(60));
        assert_eq!(breaker.state(), State::Closed);
        breaker.record_failure();
        breaker.record_failure();
        assert_eq!(breaker.state(), State::Closed);
        breaker.record_failure();
        assert_eq!(breaker.state(), State::Open);
    }

    #[test]
    fn half_opens_after_reset_timeout_then_closes_on_successes() {
        let breaker = breaker(Duration::from_millis(5));
        breaker.record_failure();
        breaker.record_failure();
        breaker.record_failure();
        assert_eq!(breaker.state(), State::Open);
        std::thread::sleep(breaker.reset_timeout() * 3);
        assert_eq!(breaker.state(), State::HalfOpen);
        breaker.record_success();
        assert_eq!(breaker.state(), State::HalfOpen);
        breaker.record_success();
        assert_eq!(breaker.state(), State::Closed);
    }

    #[test]
    fn half_open_failure_reopens_immediately() {
        let breaker = breaker(Duration::from_millis(5));
        breaker.record_failure();
        breaker.record_failure();
        breaker.record_failure();
        std::thread::sleep(breaker.reset_timeout() * 3);
        assert_eq!(breaker.state(), State::HalfOpen);
        breaker.record_failure();
        assert_eq!(breaker.state(), State::Open);
    }

    #[tokio::test]
    async fn call_short_circuits_when_open() {
        let breaker = breaker(Duration::from_secs(60));
        breaker.record_failure();
        breaker.record_failure();
        breaker.record_failure();
        let result: Result<(), Error> = breaker
            .call(|_| false, || async { Ok::<(), anyhow::Error>(()) })
            .await;
        assert!(matches!(result, Err(Error::CircuitOpen(_))));
    }

    #[tokio::test]
    async fn call_classifies_ok_result_via_is_failure() {
        let breaker = breaker(Duration::from_secs(60));
        for _ in 0..5 {
            let _: Result<bool, Error> = breaker
                .call(|found: &bool| !*found, || async { Ok::<bool, anyhow::Error>(false) })
                .await;
        }
        assert_eq!(breaker.state(), State::Open);
    }
}
