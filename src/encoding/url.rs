//! URL resolution against the service root.

use reqwest::Url;

use crate::error::ProxyError;

/// Validate and normalize a service base URL.
///
/// The base must be absolute `http`/`https`; its path always ends with `/` so
/// that relative paths resolve beneath it.
pub fn normalize_base_url(base: &str) -> Result<Url, ProxyError> {
    let mut url = Url::parse(base)
        .map_err(|e| ProxyError::configuration(format!("Invalid base URL '{base}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ProxyError::configuration(format!(
            "Unsupported base URL scheme '{}'",
            url.scheme()
        )));
    }
    if url.cannot_be_a_base() {
        return Err(ProxyError::configuration(format!(
            "Base URL '{base}' cannot carry paths"
        )));
    }
    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Resolve `path` beneath `base`.
///
/// A leading `/` is relative to the service root, not the host. `.` segments
/// are dropped and `..` segments (literal or percent-encoded) are rejected.
/// A query string in `path` is kept; fragments are discarded.
///
/// Absolute `http`/`https` URLs are rejected. A first segment that merely looks
/// like a scheme (`items:batch`) is an ordinary relative segment.
pub fn resolve(base: &Url, path: &str) -> Result<Url, ProxyError> {
    let absolute = Url::parse(path).is_ok_and(|url| matches!(url.scheme(), "http" | "https"));
    if absolute {
        return Err(ProxyError::invalid_request(format!(
            "Path '{path}' must be relative to the service base URL"
        )));
    }

    let without_fragment = path.split('#').next().unwrap_or_default();
    let (path_part, query) = match without_fragment.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (without_fragment, None),
    };

    let mut segments = Vec::new();
    for segment in path_part.trim_start_matches('/').split('/') {
        let decoded = String::from_utf8_lossy(&urlencoding::decode_binary(segment.as_bytes()))
            .into_owned();
        if decoded.split(['/', '\\']).any(|piece| piece == "..") {
            return Err(ProxyError::invalid_request(format!(
                "Path '{path}' escapes the service root"
            )));
        }
        if decoded == "." {
            continue;
        }
        segments.push(segment);
    }

    let mut url = base.clone();
    let joined = format!("{}{}", base.path(), segments.join("/"));
    url.set_path(&joined);
    if !url.path().starts_with(base.path()) {
        return Err(ProxyError::invalid_request(format!(
            "Path '{path}' escapes the service root"
        )));
    }
    url.set_query(query.filter(|q| !q.is_empty()));
    Ok(url)
}

/// Append an encoded query to the URL, after any parameters already present.
pub fn append_query(url: &mut Url, encoded: &str) {
    if encoded.is_empty() {
        return;
    }
    let query = match url.query() {
        Some(existing) if !existing.is_empty() => format!("{existing}&{encoded}"),
        _ => encoded.to_string(),
    };
    url.set_query(Some(&query));
}
