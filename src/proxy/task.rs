//! Cancellable handles for submitted invocations.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use tokio_util::sync::CancellationToken;

/// Lifecycle of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvocationState {
    Pending,
    /// An outcome other than cancellation was produced.
    Completed,
    Cancelled,
}

const PENDING: u8 = 0;
const COMPLETED: u8 = 1;
const CANCELLED: u8 = 2;

/// Handle to an in-flight invocation.
///
/// Dropping the handle does not cancel the invocation; call
/// [`InvocationTask::cancel`] for that. Clones share the same invocation.
#[derive(Debug, Clone)]
pub struct InvocationTask {
    id: Arc<str>,
    token: CancellationToken,
    state: Arc<AtomicU8>,
}

impl InvocationTask {
    pub(crate) fn new(id: &str) -> Self {
        Self {
            id: Arc::from(id),
            token: CancellationToken::new(),
            state: Arc::new(AtomicU8::new(PENDING)),
        }
    }

    /// The invocation id, as seen in `tracing` events and by interceptors.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Cancel the invocation.
    ///
    /// A pending invocation stops its round-trip and resolves its handler with
    /// [`crate::ProxyError::Cancelled`]. Cancelling a finished invocation, or
    /// cancelling twice, does nothing.
    pub fn cancel(&self) {
        if self.is_finished() || self.token.is_cancelled() {
            return;
        }
        tracing::debug!(target: "wsproxy::http", invocation_id=%self.id, "cancel requested");
        self.token.cancel();
    }

    pub fn state(&self) -> InvocationState {
        match self.state.load(Ordering::Acquire) {
            COMPLETED => InvocationState::Completed,
            CANCELLED => InvocationState::Cancelled,
            _ => InvocationState::Pending,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state() != InvocationState::Pending
    }

    pub(crate) fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Record the outcome. Only the first call has any effect.
    pub(crate) fn finish(&self, cancelled: bool) -> bool {
        let next = if cancelled { CANCELLED } else { COMPLETED };
        self.state
            .compare_exchange(PENDING, next, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
