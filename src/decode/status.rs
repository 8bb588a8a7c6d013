//! Mapping failed responses onto status errors.

use crate::error::ProxyError;
use crate::utils::mime::essence;

use super::is_json_content_type;

/// Build the error for a response with a status outside 2xx.
///
/// The JSON body, when there is one, becomes the error payload. The message is
/// taken from the payload's `message`, `error` or `error.message` field, then
/// from a `text/*` body, then from the status' canonical reason.
pub fn status_error(status: u16, content: &[u8], content_type: Option<&str>) -> ProxyError {
    let payload = content_type
        .filter(|ct| is_json_content_type(ct))
        .and_then(|_| serde_json::from_slice::<serde_json::Value>(content).ok());

    let message = payload
        .as_ref()
        .and_then(message_from_payload)
        .or_else(|| text_body(content, content_type))
        .unwrap_or_else(|| canonical_reason(status));

    ProxyError::status(status, message, payload)
}

fn message_from_payload(payload: &serde_json::Value) -> Option<String> {
    let candidates = [
        payload.get("message"),
        payload.get("error"),
        payload.get("error").and_then(|e| e.get("message")),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str())
        .map(str::to_string)
}

fn text_body(content: &[u8], content_type: Option<&str>) -> Option<String> {
    let is_text = content_type.is_some_and(|ct| essence(ct).starts_with("text/"));
    if !is_text {
        return None;
    }
    let text = String::from_utf8_lossy(content).trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn canonical_reason(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("HTTP error")
        .to_string()
}
