//! Where result handlers run.
//!
//! Handlers never run on the caller's stack or on a transport thread picked at
//! random: every proxy has one [`CallbackContext`] and all of its handlers are
//! delivered there.

use tokio::runtime::Handle;
use tokio::sync::mpsc;

type Callback = Box<dyn FnOnce() + Send + 'static>;

/// The execution context for result handlers.
#[derive(Debug, Clone, Default)]
pub enum CallbackContext {
    /// Handlers run on tasks of the proxy's tokio runtime.
    #[default]
    Runtime,
    /// Handlers are posted to a [`CallbackQueue`] drained by its owner, e.g. a
    /// UI thread.
    Queue(CallbackSender),
}

impl CallbackContext {
    /// A queue-backed context and the queue its handlers are posted to.
    pub fn queue() -> (CallbackContext, CallbackQueue) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            CallbackContext::Queue(CallbackSender { sender }),
            CallbackQueue { receiver },
        )
    }

    pub(crate) fn deliver<F>(&self, runtime: &Handle, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        match self {
            CallbackContext::Runtime => {
                runtime.spawn(async move { callback() });
            }
            CallbackContext::Queue(sender) => {
                if sender.sender.send(Box::new(callback)).is_err() {
                    tracing::warn!(target: "wsproxy::callback", "callback queue was dropped; result handler discarded");
                }
            }
        }
    }
}

/// Posting side of a [`CallbackQueue`].
#[derive(Clone)]
pub struct CallbackSender {
    sender: mpsc::UnboundedSender<Callback>,
}

impl std::fmt::Debug for CallbackSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackSender")
            .field("closed", &self.sender.is_closed())
            .finish()
    }
}

/// A queue of pending result handlers, run on whichever thread drains it.
pub struct CallbackQueue {
    receiver: mpsc::UnboundedReceiver<Callback>,
}

impl CallbackQueue {
    /// Run every handler already queued, returning how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(callback) = self.receiver.try_recv() {
            callback();
            ran += 1;
        }
        ran
    }

    /// Wait for the next handler and run it. Returns `false` once every
    /// sender is gone and the queue is empty.
    pub async fn run_next(&mut self) -> bool {
        match self.receiver.recv().await {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for CallbackQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackQueue").finish_non_exhaustive()
    }
}
