//! Poll Engine
//!
//! Every wait-style operation is a predicate retried until it turns truthy
//! (or falsy, for the negated form) or a deadline passes. Polling sleeps
//! between evaluations and never sleeps past the deadline, so a timeout fires
//! at most one poll interval plus one predicate evaluation late, and never
//! early.
//!
//! Errors the predicate returns are split in two: absence-style errors
//! ([`PinpointError::is_transient`]) count as a falsy evaluation, everything
//! else aborts the wait immediately.

use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::SessionConfig;
use crate::driver::ElementHandle;
use crate::result::{PinpointError, PinpointResult};

// =============================================================================
// TRUTHINESS
// =============================================================================

/// Whether a predicate result counts as "condition met"
pub trait Truthy {
    /// True when the value satisfies a positive wait
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl<T: Truthy> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(Truthy::is_truthy)
    }
}

impl<T> Truthy for Vec<T> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for &str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for ElementHandle {
    fn is_truthy(&self) -> bool {
        true
    }
}

/// Script results: `null`, `false`, `0`, `""`, `[]` and `{}` are falsy
impl Truthy for Value {
    fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Self::String(s) => !s.is_empty(),
            Self::Array(items) => !items.is_empty(),
            Self::Object(map) => !map.is_empty(),
        }
    }
}

// =============================================================================
// WAITER
// =============================================================================

/// Poll loop driver
#[derive(Debug, Clone, Copy)]
pub struct Waiter {
    /// Timeout used when a call passes `None`
    default_timeout: Duration,
    /// Sleep between evaluations
    poll_interval: Duration,
}

impl Default for Waiter {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

impl Waiter {
    /// Create a waiter with default timings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a waiter using the timings of a session config
    #[must_use]
    pub const fn from_config(config: &SessionConfig) -> Self {
        Self {
            default_timeout: config.timeout(),
            poll_interval: config.poll_interval(),
        }
    }

    /// Override the poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Override the default timeout
    #[must_use]
    pub const fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Timeout used when a call passes `None`
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Sleep between evaluations
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Resolve an optional per-call timeout against the default
    #[must_use]
    pub fn timeout_or_default(&self, timeout: Option<Duration>) -> Duration {
        timeout.unwrap_or(self.default_timeout)
    }

    /// Evaluate `predicate` until it returns a truthy value, and return that
    /// value.
    ///
    /// # Errors
    ///
    /// [`PinpointError::Timeout`] carrying `message` when the deadline
    /// passes; any non-transient error from the predicate as-is.
    pub fn poll_until<T, F>(
        &self,
        mut predicate: F,
        timeout: Option<Duration>,
        message: impl Into<String>,
    ) -> PinpointResult<T>
    where
        T: Truthy,
        F: FnMut() -> PinpointResult<T>,
    {
        let timeout = self.timeout_or_default(timeout);
        let deadline = Instant::now() + timeout;
        loop {
            match predicate() {
                Ok(value) if value.is_truthy() => return Ok(value),
                Ok(_) => {}
                Err(err) if err.is_transient() => debug!(error = %err, "poll predicate not yet satisfied"),
                Err(err) => return Err(err),
            }
            if self.pause_until(deadline).is_none() {
                return Err(timeout_error(message.into(), timeout));
            }
        }
    }

    /// Evaluate `predicate` until it returns a falsy value.
    ///
    /// Returns `Some` with the falsy value, or `None` when a transient error
    /// (the thing being watched is gone) ended the wait.
    ///
    /// # Errors
    ///
    /// Same as [`Waiter::poll_until`].
    pub fn poll_until_not<T, F>(
        &self,
        mut predicate: F,
        timeout: Option<Duration>,
        message: impl Into<String>,
    ) -> PinpointResult<Option<T>>
    where
        T: Truthy,
        F: FnMut() -> PinpointResult<T>,
    {
        let timeout = self.timeout_or_default(timeout);
        let deadline = Instant::now() + timeout;
        loop {
            match predicate() {
                Ok(value) if !value.is_truthy() => return Ok(Some(value)),
                Ok(_) => {}
                Err(err) if err.is_transient() => return Ok(None),
                Err(err) => return Err(err),
            }
            if self.pause_until(deadline).is_none() {
                return Err(timeout_error(message.into(), timeout));
            }
        }
    }

    /// Poll in either direction. The positive form always yields `Some`.
    ///
    /// # Errors
    ///
    /// Same as [`Waiter::poll_until`].
    pub fn poll<T, F>(
        &self,
        predicate: F,
        negate: bool,
        timeout: Option<Duration>,
        message: impl Into<String>,
    ) -> PinpointResult<Option<T>>
    where
        T: Truthy,
        F: FnMut() -> PinpointResult<T>,
    {
        if negate {
            self.poll_until_not(predicate, timeout, message)
        } else {
            self.poll_until(predicate, timeout, message).map(Some)
        }
    }

    /// Re-run `op` while it fails transiently, surfacing the last transient
    /// error itself once the deadline has passed.
    ///
    /// # Errors
    ///
    /// The first non-transient error, or the last transient one after the
    /// deadline.
    pub fn retry_transient<T, F>(&self, mut op: F, timeout: Option<Duration>) -> PinpointResult<T>
    where
        F: FnMut() -> PinpointResult<T>,
    {
        let deadline = Instant::now() + self.timeout_or_default(timeout);
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() => {
                    if self.pause_until(deadline).is_none() {
                        return Err(err);
                    }
                    debug!(error = %err, "retrying after transient failure");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Sleep one interval, clipped to the deadline. `None` once the
    /// deadline has already passed.
    fn pause_until(&self, deadline: Instant) -> Option<()> {
        let remaining = deadline.checked_duration_since(Instant::now())?;
        if remaining.is_zero() {
            return None;
        }
        std::thread::sleep(self.poll_interval.min(remaining));
        Some(())
    }
}

fn timeout_error(message: String, timeout: Duration) -> PinpointError {
    PinpointError::Timeout {
        message,
        ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn fast() -> Waiter {
        Waiter::new().with_poll_interval(Duration::from_millis(10))
    }

    fn not_found() -> PinpointError {
        PinpointError::NotFound {
            element_type: "Element".into(),
            locator: "#x".into(),
            strategy: "id".into(),
            query: "x".into(),
        }
    }

    mod truthy_tests {
        use super::*;

        #[test]
        fn test_scalars() {
            assert!(true.is_truthy());
            assert!(!false.is_truthy());
            assert!("a".is_truthy());
            assert!(!"".is_truthy());
            assert!(!String::new().is_truthy());
        }

        #[test]
        fn test_option_and_vec() {
            assert!(Some(ElementHandle::new("e")).is_truthy());
            assert!(!None::<ElementHandle>.is_truthy());
            assert!(!Some(false).is_truthy());
            assert!(!Vec::<u8>::new().is_truthy());
            assert!(vec![1].is_truthy());
        }

        #[test]
        fn test_json_values() {
            assert!(!Value::Null.is_truthy());
            assert!(!serde_json::json!(0).is_truthy());
            assert!(serde_json::json!(0.5).is_truthy());
            assert!(!serde_json::json!("").is_truthy());
            assert!(!serde_json::json!([]).is_truthy());
            assert!(serde_json::json!([0]).is_truthy());
            assert!(!serde_json::json!({}).is_truthy());
            assert!(serde_json::json!(true).is_truthy());
        }
    }

    mod poll_until_tests {
        use super::*;

        #[test]
        fn test_immediate_success_returns_value() {
            let value = fast()
                .poll_until(|| Ok(serde_json::json!("ready")), Some(Duration::from_millis(100)), "msg")
                .unwrap();
            assert_eq!(value, serde_json::json!("ready"));
        }

        #[test]
        fn test_eventual_success() {
            let calls = Cell::new(0);
            let value = fast()
                .poll_until(
                    || {
                        calls.set(calls.get() + 1);
                        Ok(calls.get() >= 3)
                    },
                    Some(Duration::from_secs(1)),
                    "msg",
                )
                .unwrap();
            assert!(value);
            assert_eq!(calls.get(), 3);
        }

        #[test]
        fn test_timeout_not_before_deadline() {
            let timeout = Duration::from_millis(150);
            let start = Instant::now();
            let err = fast().poll_until(|| Ok(false), Some(timeout), "never").unwrap_err();
            let elapsed = start.elapsed();
            assert!(elapsed >= timeout, "fired early: {elapsed:?}");
            assert!(elapsed < timeout + Duration::from_millis(100), "fired late: {elapsed:?}");
            match err {
                PinpointError::Timeout { message, ms } => {
                    assert_eq!(message, "never");
                    assert_eq!(ms, 150);
                }
                other => panic!("expected Timeout, got {other:?}"),
            }
        }

        #[test]
        fn test_transient_errors_keep_polling() {
            let calls = Cell::new(0);
            let found = fast()
                .poll_until(
                    || {
                        calls.set(calls.get() + 1);
                        if calls.get() < 3 {
                            Err(not_found())
                        } else {
                            Ok(ElementHandle::new("e1"))
                        }
                    },
                    Some(Duration::from_secs(1)),
                    "msg",
                )
                .unwrap();
            assert_eq!(found.id, "e1");
        }

        #[test]
        fn test_transient_errors_become_timeout() {
            let err = fast()
                .poll_until(|| Err::<bool, _>(not_found()), Some(Duration::from_millis(50)), "gone")
                .unwrap_err();
            assert!(matches!(err, PinpointError::Timeout { .. }));
        }

        #[test]
        fn test_fatal_error_propagates_immediately() {
            let calls = Cell::new(0);
            let err = fast()
                .poll_until(
                    || {
                        calls.set(calls.get() + 1);
                        Err::<bool, _>(PinpointError::Parse {
                            locator: "bad".into(),
                        })
                    },
                    Some(Duration::from_secs(1)),
                    "msg",
                )
                .unwrap_err();
            assert!(matches!(err, PinpointError::Parse { .. }));
            assert_eq!(calls.get(), 1);
        }

        #[test]
        fn test_zero_timeout_evaluates_once() {
            let calls = Cell::new(0);
            let result = fast().poll_until(
                || {
                    calls.set(calls.get() + 1);
                    Ok(false)
                },
                Some(Duration::ZERO),
                "msg",
            );
            assert!(result.is_err());
            assert_eq!(calls.get(), 1);
        }
    }

    mod poll_until_not_tests {
        use super::*;

        #[test]
        fn test_returns_falsy_value() {
            let value = fast()
                .poll_until_not(|| Ok(Vec::<u8>::new()), Some(Duration::from_millis(50)), "msg")
                .unwrap();
            assert_eq!(value, Some(Vec::new()));
        }

        #[test]
        fn test_timeout_when_always_truthy() {
            let timeout = Duration::from_millis(120);
            let start = Instant::now();
            let err = fast()
                .poll_until_not(|| Ok(true), Some(timeout), "still there")
                .unwrap_err();
            assert!(start.elapsed() >= timeout);
            assert!(matches!(err, PinpointError::Timeout { ref message, .. } if message == "still there"));
        }

        #[test]
        fn test_transient_error_satisfies_negated_wait() {
            let value = fast()
                .poll_until_not(|| Err::<bool, _>(not_found()), Some(Duration::from_millis(50)), "msg")
                .unwrap();
            assert_eq!(value, None);
        }

        #[test]
        fn test_poll_dispatches_on_negate() {
            let waiter = fast();
            let t = Some(Duration::from_millis(30));
            assert_eq!(waiter.poll(|| Ok(true), false, t, "m").unwrap(), Some(true));
            assert_eq!(waiter.poll(|| Ok(false), true, t, "m").unwrap(), Some(false));
        }
    }

    mod retry_transient_tests {
        use super::*;

        #[test]
        fn test_succeeds_after_retries() {
            let calls = Cell::new(0);
            let value = fast()
                .retry_transient(
                    || {
                        calls.set(calls.get() + 1);
                        if calls.get() < 4 {
                            Err(PinpointError::no_such_window("not yet"))
                        } else {
                            Ok("w2")
                        }
                    },
                    Some(Duration::from_secs(1)),
                )
                .unwrap();
            assert_eq!(value, "w2");
        }

        #[test]
        fn test_surfaces_transient_error_after_deadline() {
            let timeout = Duration::from_millis(80);
            let start = Instant::now();
            let err = fast()
                .retry_transient(
                    || Err::<(), _>(PinpointError::no_such_window("never")),
                    Some(timeout),
                )
                .unwrap_err();
            assert!(start.elapsed() >= timeout);
            assert!(matches!(err, PinpointError::NoSuchWindow { .. }));
        }

        #[test]
        fn test_fatal_error_not_retried() {
            let calls = Cell::new(0);
            let err = fast()
                .retry_transient(
                    || {
                        calls.set(calls.get() + 1);
                        Err::<(), _>(PinpointError::driver("boom"))
                    },
                    Some(Duration::from_secs(1)),
                )
                .unwrap_err();
            assert!(matches!(err, PinpointError::Driver { .. }));
            assert_eq!(calls.get(), 1);
        }
    }

    mod waiter_config_tests {
        use super::*;

        #[test]
        fn test_defaults_from_config() {
            let waiter = Waiter::new();
            assert_eq!(waiter.default_timeout(), Duration::from_secs(15));
            assert_eq!(waiter.poll_interval(), Duration::from_millis(200));
        }

        #[test]
        fn test_timeout_or_default() {
            let waiter = Waiter::new().with_default_timeout(Duration::from_secs(3));
            assert_eq!(waiter.timeout_or_default(None), Duration::from_secs(3));
            assert_eq!(
                waiter.timeout_or_default(Some(Duration::from_millis(5))),
                Duration::from_millis(5)
            );
        }
    }
}
