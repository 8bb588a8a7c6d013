//! Core error types.

use std::fmt;

use thiserror::Error;

/// Coarse classification of a [`ProxyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The request never completed: DNS, TLS, connection, timeout or I/O failure.
    Transport,
    /// The server answered with a status outside 2xx.
    Status,
    /// The response body could not be decoded.
    Decode,
    /// The invocation was cancelled by its owner.
    Cancelled,
    /// The request could not be constructed (bad path, arguments or body).
    InvalidRequest,
    /// The proxy itself is misconfigured.
    Configuration,
}

/// Failure kinds reported by a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    Connect,
    Timeout,
    Io,
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Io => "io",
            TransportErrorKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// An error raised by the transport while executing a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} failure: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connect, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Io, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Other, message)
    }
}

/// A response body that could not be turned into the expected value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DecodeError {
    pub message: String,
    /// Content type of the rejected response, when known.
    pub content_type: Option<String>,
}

impl DecodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: Option<&str>) -> Self {
        self.content_type = content_type.map(str::to_string);
        self
    }
}

/// The single error domain for everything an invocation can report.
#[derive(Debug, Clone, Error)]
pub enum ProxyError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        /// Server-supplied error payload, when the body was JSON.
        payload: Option<serde_json::Value>,
    },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invocation was cancelled")]
    Cancelled,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ProxyError {
    pub fn status(
        status: u16,
        message: impl Into<String>,
        payload: Option<serde_json::Value>,
    ) -> Self {
        ProxyError::Status {
            status,
            message: message.into(),
            payload,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        ProxyError::InvalidRequest(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        ProxyError::Configuration(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ProxyError::Transport(_) => ErrorCategory::Transport,
            ProxyError::Status { .. } => ErrorCategory::Status,
            ProxyError::Decode(_) => ErrorCategory::Decode,
            ProxyError::Cancelled => ErrorCategory::Cancelled,
            ProxyError::InvalidRequest(_) => ErrorCategory::InvalidRequest,
            ProxyError::Configuration(_) => ErrorCategory::Configuration,
        }
    }

    /// HTTP status code for server-reported failures.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProxyError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Decoded server error payload, if any.
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            ProxyError::Status { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    /// "The server said no."
    pub fn is_server_failure(&self) -> bool {
        matches!(self, ProxyError::Status { .. })
    }

    /// "The request never completed": transport failures and cancellation.
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, ProxyError::Transport(_) | ProxyError::Cancelled)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ProxyError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_distinct_for_server_and_transport() {
        let server = ProxyError::status(503, "Service Unavailable", None);
        let transport: ProxyError = TransportError::timeout("deadline elapsed").into();

        assert_eq!(server.category(), ErrorCategory::Status);
        assert_eq!(transport.category(), ErrorCategory::Transport);
        assert!(server.is_server_failure() && !server.is_transport_failure());
        assert!(transport.is_transport_failure() && !transport.is_server_failure());
    }

    #[test]
    fn cancellation_counts_as_never_completed() {
        let err = ProxyError::Cancelled;
        assert!(err.is_cancelled());
        assert!(err.is_transport_failure());
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn status_error_exposes_code_and_payload() {
        let payload = serde_json::json!({"message": "missing"});
        let err = ProxyError::status(404, "missing", Some(payload.clone()));
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.payload(), Some(&payload));
        assert_eq!(err.to_string(), "HTTP 404: missing");
    }

    #[test]
    fn transport_error_display_includes_kind() {
        let err = TransportError::connect("connection refused");
        assert_eq!(err.to_string(), "connect failure: connection refused");
    }
}
