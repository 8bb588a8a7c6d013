//! In-process transports and logging setup shared by the integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use tokio::sync::Notify;
use wsproxy::error::TransportError;
use wsproxy::transport::{HttpTransport, TransportRequest, TransportResponse};

/// Install a `tracing` subscriber once, honouring `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Replies with queued responses in order and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(self: &Arc<Self>, response: TransportResponse) -> Arc<Self> {
        self.responses.lock().unwrap().push_back(Ok(response));
        self.clone()
    }

    pub fn fail(self: &Arc<Self>, error: TransportError) -> Arc<Self> {
        self.responses.lock().unwrap().push_back(Err(error));
        self.clone()
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(TransportResponse::new(204, Vec::new())))
    }
}

/// Holds every request until [`PendingTransport::release`] is called, and
/// records whether an in-flight request future was dropped.
#[derive(Default)]
pub struct PendingTransport {
    started: AtomicUsize,
    started_notify: Notify,
    release: Notify,
    dropped: Arc<AtomicBool>,
}

impl PendingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Wait until `count` requests have reached the transport.
    pub async fn wait_started(&self, count: usize) {
        loop {
            let notified = self.started_notify.notified();
            if self.started.load(Ordering::SeqCst) >= count {
                return;
            }
            notified.await;
        }
    }

    pub fn release(&self) {
        self.release.notify_waiters();
    }

    pub fn was_dropped(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }
}

struct DropFlag(Arc<AtomicBool>, bool);

impl Drop for DropFlag {
    fn drop(&mut self) {
        if !self.1 {
            self.0.store(true, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl HttpTransport for PendingTransport {
    async fn execute(&self, _request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut flag = DropFlag(self.dropped.clone(), false);
        let released = self.release.notified();
        self.started.fetch_add(1, Ordering::SeqCst);
        self.started_notify.notify_waiters();
        released.await;
        flag.1 = true;
        Ok(TransportResponse::new(200, b"done".to_vec()).with_header("Content-Type", "text/plain"))
    }
}
