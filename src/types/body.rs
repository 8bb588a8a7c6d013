//! Explicit request bodies.

use serde::Serialize;

use crate::defaults::content_types::{JSON, OCTET_STREAM};
use crate::error::ProxyError;

/// A raw request payload supplied by the caller.
///
/// When present it takes precedence over argument-based body encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    pub content: Vec<u8>,
    /// Sent as `application/octet-stream` when not set.
    pub content_type: Option<String>,
}

impl RequestBody {
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Serialize a value as a JSON body.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ProxyError> {
        let content = serde_json::to_vec(value).map_err(|e| {
            ProxyError::invalid_request(format!("Failed to serialize JSON body: {e}"))
        })?;
        Ok(Self::new(content).with_content_type(JSON))
    }

    pub fn effective_content_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or(OCTET_STREAM)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(content: Vec<u8>) -> Self {
        RequestBody::new(content)
    }
}

impl From<&[u8]> for RequestBody {
    fn from(content: &[u8]) -> Self {
        RequestBody::new(content)
    }
}
