//! Cooperative frame cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag asking the scheduler to stop the in-flight frame.
///
/// Clones share the same flag, so a token handed to another thread can
/// cancel a frame running on this one. The scheduler only looks at the
/// flag between stages: a stage that has started always finishes.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A fresh, unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Clear a pending request.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}
