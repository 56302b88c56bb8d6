//! Retry and backoff policy.
//!
//! This module encapsulates error classification (timeouts, throttling,
//! connection failures) and backoff decisions so that the transport and any
//! future caller share one policy: linear backoff for network failures, a
//! capped, growing pause when the server throttles, and no retry for any
//! other HTTP status.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::{AttemptError, RetryError};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::{run_with_retry, Sleeper, ThreadSleeper};
