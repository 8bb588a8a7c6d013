//! `application/x-www-form-urlencoded` encoding.
//!
//! Keys and values are percent-encoded with the RFC 3986 unreserved set
//! (`A-Z a-z 0-9 - . _ ~` pass through). Space becomes `%20` and `+` becomes
//! `%2B`, so encoded output is unambiguous for both form and query parsers.

use crate::error::ProxyError;
use crate::types::{Arguments, Value};

/// Encode arguments as `key=value` pairs joined by `&`.
///
/// Lists repeat the key once per element in order; nulls are omitted.
/// Attachments cannot be represented and are rejected.
pub fn encode_form(arguments: &Arguments) -> Result<String, ProxyError> {
    let mut pairs = Vec::new();
    for (key, value) in arguments.fields() {
        if let Value::Attachment(attachment) = value {
            return Err(ProxyError::invalid_request(format!(
                "Attachment '{}' for argument '{key}' requires multipart/form-data encoding",
                attachment.filename
            )));
        }
        if let Some(text) = value.as_text() {
            pairs.push(format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&text)
            ));
        }
    }
    Ok(pairs.join("&"))
}

/// Parse a form or query string back into ordered key/value pairs.
///
/// `+` is read as a space, as form parsers do.
pub fn parse_form(input: &str) -> Vec<(String, String)> {
    input
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(component: &str) -> String {
    let spaced = component.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}
