//! Retry loop: run a closure until success or the policy says stop.

use std::time::Duration;

use super::classify;
use super::error::{AttemptError, RetryError};
use super::policy::{ErrorKind, RetryDecision, RetryPolicy};
use crate::transport::CancelToken;

/// Blocking pause between attempts. Swapped out in tests so backoff can be
/// observed without real sleeping.
pub trait Sleeper {
    fn sleep(&self, d: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, d: Duration) {
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }
}

/// Runs a closure until it succeeds or the retry policy says to stop.
/// On retryable failure, logs and sleeps for the backoff duration then tries
/// again. `f` receives the 1-based attempt number.
pub fn run_with_retry<T, F>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    cancel: Option<&CancelToken>,
    mut f: F,
) -> Result<T, RetryError>
where
    F: FnMut(u32) -> Result<T, AttemptError>,
{
    let mut attempt = 1u32;
    loop {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(RetryError::Cancelled { attempt });
        }
        let err = match f(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => e,
        };
        let kind = classify::classify(&err);
        match policy.decide(attempt, kind) {
            RetryDecision::RetryAfter(d) => {
                tracing::warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    ?kind,
                    "request failed: {}; retrying in {:.1}s",
                    err,
                    d.as_secs_f64()
                );
                sleeper.sleep(d);
                attempt += 1;
            }
            RetryDecision::NoRetry if kind == ErrorKind::Other => {
                return Err(RetryError::Rejected {
                    attempt,
                    cause: err,
                });
            }
            RetryDecision::NoRetry => {
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last: err,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorded(RefCell<Vec<Duration>>);

    impl Sleeper for Recorded {
        fn sleep(&self, d: Duration) {
            self.0.borrow_mut().push(d);
        }
    }

    #[test]
    fn success_on_first_attempt_never_sleeps() {
        let sleeper = Recorded::default();
        let out = run_with_retry(&RetryPolicy::default(), &sleeper, None, |_| Ok(7)).unwrap();
        assert_eq!(out, 7);
        assert!(sleeper.0.borrow().is_empty());
    }

    #[test]
    fn rejected_status_stops_immediately() {
        let sleeper = Recorded::default();
        let mut calls = 0;
        let err = run_with_retry(&RetryPolicy::default(), &sleeper, None, |_| -> Result<(), _> {
            calls += 1;
            Err(AttemptError::Http(404))
        })
        .unwrap_err();
        assert_eq!(calls, 1);
        assert!(matches!(
            err,
            RetryError::Rejected {
                attempt: 1,
                cause: AttemptError::Http(404)
            }
        ));
        assert!(sleeper.0.borrow().is_empty());
    }

    #[test]
    fn cancelled_token_prevents_first_attempt() {
        let token = CancelToken::new();
        token.cancel();
        let mut calls = 0;
        let err = run_with_retry(
            &RetryPolicy::default(),
            &Recorded::default(),
            Some(&token),
            |_| -> Result<(), _> {
                calls += 1;
                Ok(())
            },
        )
        .unwrap_err();
        assert_eq!(calls, 0);
        assert!(matches!(err, RetryError::Cancelled { attempt: 1 }));
    }
}
