//! Cancellation for an in-flight retrieval.
//!
//! A `CancelToken` is shared between whoever may want to stop the pipeline
//! (e.g. a signal handler) and the transport. The transport checks it before
//! every attempt; a request already on the wire is bounded by its timeout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
