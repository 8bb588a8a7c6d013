//! MIME type detection utilities

use crate::defaults::content_types::OCTET_STREAM;

/// Guess MIME by inspecting bytes (magic numbers)
pub fn guess_mime_from_bytes(bytes: &[u8]) -> Option<String> {
    infer::get(bytes).map(|k| k.mime_type().to_string())
}

/// Guess MIME by file name or path (extension-based)
pub fn guess_mime_from_filename(filename: &str) -> Option<String> {
    mime_guess::from_path(filename)
        .first_raw()
        .map(|s| s.to_string())
}

/// Combined guess: prefer bytes, fall back to extension, otherwise octet-stream
pub fn guess_mime(bytes: Option<&[u8]>, filename: Option<&str>) -> String {
    bytes
        .and_then(guess_mime_from_bytes)
        .or_else(|| filename.and_then(guess_mime_from_filename))
        .unwrap_or_else(|| OCTET_STREAM.to_string())
}

/// The media type of a content type header value, lowercased and without parameters.
///
/// `"Application/JSON; charset=utf-8"` becomes `"application/json"`.
pub fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
