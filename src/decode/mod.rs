//! Response Decoding
//!
//! Successful response bodies are handed to a [`ResponseDecoder`]. The
//! [`DefaultDecoder`] parses JSON content types into `serde_json::Value` and
//! returns anything else as raw bytes; callers can supply their own decoder
//! per invocation, including any closure of the right shape.

mod status;

pub use status::status_error;

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::error::DecodeError;
use crate::utils::mime::essence;

/// The value produced by the default decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseValue {
    /// A body with a JSON content type, parsed.
    Json(serde_json::Value),
    /// Any other body, untouched.
    Bytes(Vec<u8>),
    /// A zero-length body.
    Empty,
}

impl ResponseValue {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ResponseValue::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            ResponseValue::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ResponseValue::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ResponseValue::Empty)
    }
}

/// Turns a successful response body into a domain value.
pub trait ResponseDecoder<T>: Send + Sync {
    fn decode(&self, content: &[u8], content_type: Option<&str>) -> Result<T, DecodeError>;
}

impl<T, F> ResponseDecoder<T> for F
where
    F: Fn(&[u8], Option<&str>) -> Result<T, DecodeError> + Send + Sync,
{
    fn decode(&self, content: &[u8], content_type: Option<&str>) -> Result<T, DecodeError> {
        self(content, content_type)
    }
}

/// Whether a content type denotes JSON: `application/json`, `text/json` or
/// any `application/*+json`, ignoring case and parameters.
pub fn is_json_content_type(content_type: &str) -> bool {
    let essence = essence(content_type);
    essence == "application/json"
        || essence == "text/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// JSON for JSON content types, bytes for everything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDecoder;

impl ResponseDecoder<ResponseValue> for DefaultDecoder {
    fn decode(
        &self,
        content: &[u8],
        content_type: Option<&str>,
    ) -> Result<ResponseValue, DecodeError> {
        if content.is_empty() {
            return Ok(ResponseValue::Empty);
        }
        match content_type {
            Some(ct) if is_json_content_type(ct) => serde_json::from_slice(content)
                .map(ResponseValue::Json)
                .map_err(|e| DecodeError::from(e).with_content_type(content_type)),
            _ => Ok(ResponseValue::Bytes(content.to_vec())),
        }
    }
}

/// Deserializes the body into `T`, whatever the content type says.
///
/// An empty body is read as JSON `null`, so `()` and `Option<_>` targets accept it.
pub struct JsonDecoder<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonDecoder<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonDecoder<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for JsonDecoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsonDecoder<{}>", std::any::type_name::<T>())
    }
}

impl<T: DeserializeOwned> ResponseDecoder<T> for JsonDecoder<T> {
    fn decode(&self, content: &[u8], content_type: Option<&str>) -> Result<T, DecodeError> {
        let content: &[u8] = if content.is_empty() { b"null" } else { content };
        serde_json::from_slice(content).map_err(|e| {
            DecodeError::new(format!(
                "Unable to deserialize response body into {}: {e}",
                std::any::type_name::<T>()
            ))
            .with_content_type(content_type)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn recognizes_json_variants() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("Application/JSON; charset=utf-8"));
        assert!(is_json_content_type("application/problem+json"));
        assert!(is_json_content_type("text/json"));
        assert!(!is_json_content_type("text/plain"));
        assert!(!is_json_content_type("application/jsonl"));
    }

    #[test]
    fn default_decoder_parses_json() {
        let value = DefaultDecoder
            .decode(br#"[0,1,1,2]"#, Some("application/json"))
            .unwrap();
        assert_eq!(value, ResponseValue::Json(serde_json::json!([0, 1, 1, 2])));
    }

    #[test]
    fn default_decoder_returns_bytes_for_other_types() {
        let value = DefaultDecoder.decode(b"\x89PNG", Some("image/png")).unwrap();
        assert_eq!(value.as_bytes(), Some(&b"\x89PNG"[..]));

        let untyped = DefaultDecoder.decode(b"{}", None).unwrap();
        assert_eq!(untyped.as_bytes(), Some(&b"{}"[..]));
    }

    #[test]
    fn default_decoder_reports_malformed_json() {
        let err = DefaultDecoder
            .decode(b"{not json", Some("application/json"))
            .unwrap_err();
        assert_eq!(err.content_type.as_deref(), Some("application/json"));
    }

    #[test]
    fn empty_bodies_are_empty_values() {
        assert!(DefaultDecoder.decode(b"", Some("application/json")).unwrap().is_empty());
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Greeting {
        text: String,
    }

    #[test]
    fn json_decoder_targets_typed_values() {
        let decoder = JsonDecoder::<Greeting>::new();
        let greeting = decoder
            .decode(br#"{"text":"hi"}"#, Some("application/json"))
            .unwrap();
        assert_eq!(greeting, Greeting { text: "hi".into() });
        assert!(decoder.decode(b"[]", None).is_err());

        assert!(JsonDecoder::<()>::new().decode(b"", None).is_ok());
    }

    #[test]
    fn closures_are_decoders() {
        let decoder = |content: &[u8], _: Option<&str>| -> Result<usize, DecodeError> {
            Ok(content.len())
        };
        assert_eq!(decoder.decode(b"abc", None).unwrap(), 3);
    }
}
