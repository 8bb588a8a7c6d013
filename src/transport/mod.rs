//! HTTP transport abstraction.
//!
//! The proxy never performs network I/O itself. It hands a fully-formed
//! [`TransportRequest`] to an injectable [`HttpTransport`] and gets back the raw
//! status, headers and body. Connection pooling, TLS, cookies, redirects and
//! timeouts are the transport's business.
//!
//! Cancellation is expressed by dropping the future returned from
//! [`HttpTransport::execute`]; implementations must abort the in-flight request
//! when that happens (as `reqwest` does).

mod reqwest_transport;

pub use reqwest_transport::{ReqwestTransport, build_http_client_from_config};

use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use crate::error::TransportError;
use crate::types::Method;

/// A fully-formed outbound request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Invocation id, for correlating logs across layers.
    pub id: String,
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl TransportRequest {
    pub fn content_type(&self) -> Option<&str> {
        header_str(&self.headers, CONTENT_TYPE)
    }
}

/// The raw outcome of a completed round-trip.
#[derive(Debug, Clone, Default)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Add a header; invalid names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    pub fn content_type(&self) -> Option<&str> {
        header_str(&self.headers, CONTENT_TYPE)
    }
}

fn header_str(headers: &HeaderMap, name: HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Executes requests on behalf of the proxy.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: TransportRequest)
    -> Result<TransportResponse, TransportError>;
}
