//! Error type for a single request attempt, and the outcome of a retry loop.

/// Error returned by one attempt (curl failure or non-2xx HTTP status).
/// Used so we can classify and decide retries before surfacing a typed error.
#[derive(Debug, thiserror::Error)]
pub enum AttemptError {
    /// Curl reported an error (timeout, connection, bad URL, etc.).
    #[error(transparent)]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
}

/// Why a retry loop stopped without a success.
#[derive(Debug, thiserror::Error)]
pub enum RetryError {
    /// The error is not retryable; `attempt` is the 1-based attempt that hit it.
    #[error("attempt {attempt} failed: {cause}")]
    Rejected {
        attempt: u32,
        #[source]
        cause: AttemptError,
    },
    /// Every attempt allowed by the policy failed with a retryable error.
    #[error("gave up after {attempts} attempt(s): {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: AttemptError,
    },
    /// The cancel token was tripped before `attempt` could start.
    #[error("cancelled before attempt {attempt}")]
    Cancelled { attempt: u32 },
}
