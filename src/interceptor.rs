//! HTTP Interceptor interfaces
//!
//! Interceptors can observe and tweak outbound requests before they reach the
//! transport, observe responses, and be notified of errors. The hooks are
//! best-effort and should avoid expensive work.

use crate::error::ProxyError;
use crate::transport::{TransportRequest, TransportResponse};
use crate::types::Method;

/// Context passed to interceptors describing the invocation.
#[derive(Clone, Debug)]
pub struct HttpRequestContext {
    pub invocation_id: String,
    pub method: Method,
    pub url: String,
}

impl HttpRequestContext {
    pub(crate) fn for_request(request: &TransportRequest) -> Self {
        Self {
            invocation_id: request.id.clone(),
            method: request.method,
            url: request.url.to_string(),
        }
    }
}

/// HTTP interceptor trait
pub trait HttpInterceptor: Send + Sync {
    /// Called before the request is handed to the transport. Interceptors may
    /// add or replace headers. Returning an error aborts the invocation.
    fn on_before_send(
        &self,
        _ctx: &HttpRequestContext,
        _request: &mut TransportRequest,
    ) -> Result<(), ProxyError> {
        Ok(())
    }

    /// Called when the transport returns a response, whatever its status.
    fn on_response(&self, _ctx: &HttpRequestContext, _response: &TransportResponse) {}

    /// Called when the invocation fails, including cancellation.
    fn on_error(&self, _ctx: &HttpRequestContext, _error: &ProxyError) {}
}

/// A simple logging interceptor backed by `tracing` (no bodies or header values).
#[derive(Clone, Default)]
pub struct LoggingInterceptor;

impl HttpInterceptor for LoggingInterceptor {
    fn on_before_send(
        &self,
        ctx: &HttpRequestContext,
        request: &mut TransportRequest,
    ) -> Result<(), ProxyError> {
        tracing::debug!(target: "wsproxy::http", invocation_id=%ctx.invocation_id, method=%ctx.method, url=%ctx.url, body_bytes=request.body.as_ref().map_or(0, Vec::len), "sending request");
        Ok(())
    }

    fn on_response(&self, ctx: &HttpRequestContext, response: &TransportResponse) {
        tracing::debug!(target: "wsproxy::http", invocation_id=%ctx.invocation_id, url=%ctx.url, status=response.status, "response received");
    }

    fn on_error(&self, ctx: &HttpRequestContext, error: &ProxyError) {
        tracing::debug!(target: "wsproxy::http", invocation_id=%ctx.invocation_id, url=%ctx.url, err=%error, "request error");
    }
}
