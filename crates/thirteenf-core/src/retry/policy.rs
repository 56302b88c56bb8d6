use std::time::Duration;

/// High-level classification of an error for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Server asked us to slow down (429, 503).
    Throttled,
    /// Network-level failure (connection reset, DNS, etc.).
    Connection,
    /// Any other error (never retried).
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Linear backoff for network failures, capped linear pause for throttling.
///
/// Every failed attempt, throttled or not, consumes one of `max_attempts`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Delay unit for timeouts and connection failures (`attempt * base_delay`).
    pub base_delay: Duration,
    /// Delay unit while throttled (`attempt * throttle_step`).
    pub throttle_step: Duration,
    /// Upper bound on a throttle pause.
    pub throttle_ceiling: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            throttle_step: Duration::from_millis(1500),
            throttle_ceiling: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Decide what to do after `attempt` (1-based) failed with `kind`.
    /// Returns `RetryDecision::NoRetry` once the budget is spent, so there is
    /// never a pause after the final attempt.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }

        match kind {
            ErrorKind::Other => RetryDecision::NoRetry,
            ErrorKind::Timeout | ErrorKind::Connection => {
                RetryDecision::RetryAfter(self.base_delay.saturating_mul(attempt))
            }
            ErrorKind::Throttled => {
                let raw = self.throttle_step.saturating_mul(attempt);
                RetryDecision::RetryAfter(raw.min(self.throttle_ceiling))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delay(p: &RetryPolicy, attempt: u32, kind: ErrorKind) -> Duration {
        match p.decide(attempt, kind) {
            RetryDecision::RetryAfter(d) => d,
            RetryDecision::NoRetry => panic!("expected retry"),
        }
    }

    #[test]
    fn no_retry_for_other() {
        let p = RetryPolicy::default();
        assert_eq!(p.decide(1, ErrorKind::Other), RetryDecision::NoRetry);
    }

    #[test]
    fn network_backoff_is_linear() {
        let p = RetryPolicy {
            max_attempts: 10,
            ..RetryPolicy::default()
        };
        assert_eq!(delay(&p, 1, ErrorKind::Timeout), Duration::from_secs(1));
        assert_eq!(delay(&p, 2, ErrorKind::Connection), Duration::from_secs(2));
        assert_eq!(delay(&p, 5, ErrorKind::Timeout), Duration::from_secs(5));
    }

    #[test]
    fn throttle_pause_grows_and_is_capped() {
        let p = RetryPolicy {
            max_attempts: 20,
            ..RetryPolicy::default()
        };
        assert_eq!(delay(&p, 1, ErrorKind::Throttled), Duration::from_millis(1500));
        assert_eq!(delay(&p, 2, ErrorKind::Throttled), Duration::from_secs(3));
        assert_eq!(delay(&p, 10, ErrorKind::Throttled), p.throttle_ceiling);
    }

    #[test]
    fn respects_max_attempts() {
        let p = RetryPolicy::default();
        assert!(matches!(
            p.decide(1, ErrorKind::Throttled),
            RetryDecision::RetryAfter(_)
        ));
        assert!(matches!(
            p.decide(2, ErrorKind::Timeout),
            RetryDecision::RetryAfter(_)
        ));
        assert_eq!(p.decide(3, ErrorKind::Throttled), RetryDecision::NoRetry);
        assert_eq!(p.decide(3, ErrorKind::Connection), RetryDecision::NoRetry);
    }
}
