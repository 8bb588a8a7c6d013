//! `multipart/form-data` encoding.
//!
//! Parts are rendered before a boundary is chosen so the boundary can be
//! checked against every byte that will appear between delimiters.

use rand::Rng;
use reqwest::header::HeaderValue;
use rand::distributions::Alphanumeric;

use crate::defaults::multipart::{BOUNDARY_PREFIX, BOUNDARY_RANDOM_LEN, MAX_BOUNDARY_ATTEMPTS};
use crate::error::ProxyError;
use crate::types::{Arguments, Value};

/// An encoded multipart body and the boundary that delimits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    pub boundary: String,
    pub content: Vec<u8>,
}

impl MultipartBody {
    /// Value for the `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!(
            "{}; boundary={}",
            crate::defaults::content_types::MULTIPART_FORM_DATA,
            self.boundary
        )
    }
}

struct Part {
    headers: String,
    content: Vec<u8>,
}

impl Part {
    fn contains(&self, needle: &[u8]) -> bool {
        contains_subslice(self.headers.as_bytes(), needle) || contains_subslice(&self.content, needle)
    }
}

/// Generate a random boundary token.
pub fn generate_boundary() -> String {
    let random: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(BOUNDARY_RANDOM_LEN)
        .map(char::from)
        .collect();
    format!("{BOUNDARY_PREFIX}{random}")
}

/// Encode arguments with a random boundary.
pub fn encode_multipart(arguments: &Arguments) -> Result<MultipartBody, ProxyError> {
    encode_multipart_with(arguments, generate_boundary)
}

/// Encode arguments, drawing boundary candidates from `next_boundary` until one
/// occurs nowhere inside the rendered parts, dashes or not.
pub fn encode_multipart_with<F>(
    arguments: &Arguments,
    mut next_boundary: F,
) -> Result<MultipartBody, ProxyError>
where
    F: FnMut() -> String,
{
    let parts = render_parts(arguments)?;

    for attempt in 1..=MAX_BOUNDARY_ATTEMPTS {
        let boundary = next_boundary();
        if parts.iter().any(|p| p.contains(boundary.as_bytes())) {
            tracing::trace!(target: "wsproxy::encoding", attempt, "multipart boundary collided with part content");
            continue;
        }
        let delimiter = format!("--{boundary}");
        return Ok(MultipartBody {
            content: assemble(&parts, &delimiter),
            boundary,
        });
    }

    Err(ProxyError::invalid_request(format!(
        "Could not find a multipart boundary absent from the body after {MAX_BOUNDARY_ATTEMPTS} attempts"
    )))
}

fn render_parts(arguments: &Arguments) -> Result<Vec<Part>, ProxyError> {
    let mut parts = Vec::new();
    for (key, value) in arguments.fields() {
        match value {
            Value::Attachment(attachment) => {
                // Part headers are raw bytes in the body; CR/LF would start a new header.
                HeaderValue::from_str(&attachment.content_type).map_err(|_| {
                    ProxyError::invalid_request(format!(
                        "Invalid content type for attachment '{}' in argument '{key}'",
                        attachment.filename
                    ))
                })?;
                parts.push(Part {
                    headers: format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n",
                        escape_quoted(key),
                        escape_quoted(&attachment.filename),
                        attachment.content_type
                    ),
                    content: attachment.data.clone(),
                });
            }
            other => {
                if let Some(text) = other.as_text() {
                    parts.push(Part {
                        headers: format!(
                            "Content-Disposition: form-data; name=\"{}\"\r\n",
                            escape_quoted(key)
                        ),
                        content: text.into_bytes(),
                    });
                }
            }
        }
    }
    Ok(parts)
}

fn assemble(parts: &[Part], delimiter: &str) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(delimiter.as_bytes());
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.headers.as_bytes());
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(&part.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(delimiter.as_bytes());
    body.extend_from_slice(b"--\r\n");
    body
}

// WHATWG form-data escaping for quoted header parameters.
fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn contains_subslice(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty()
        && haystack.len() >= needle.len()
        && haystack.windows(needle.len()).any(|w| w == needle)
}
