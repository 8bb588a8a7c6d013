//! Description of a single service call and how it becomes a request.

use reqwest::Url;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use crate::encoding::{append_query, encode_body, encode_form, resolve};
use crate::error::ProxyError;
use crate::transport::TransportRequest;
use crate::types::{Argument, Arguments, Encoding, Method, RequestBody};

/// One call against the service: method, path, arguments and optional body.
///
/// ```rust
/// use wsproxy::prelude::*;
///
/// let invocation = Invocation::new(Method::Post, "items")
///     .argument("name", "widget")
///     .argument("count", 3)
///     .header("X-Request-Source", "docs");
/// assert_eq!(invocation.method(), Method::Post);
/// ```
#[derive(Debug, Clone)]
pub struct Invocation {
    method: Method,
    path: String,
    arguments: Arguments,
    body: Option<RequestBody>,
    headers: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            arguments: Arguments::new(),
            body: None,
            headers: Vec::new(),
        }
    }

    /// Replace the arguments.
    pub fn arguments(mut self, arguments: Arguments) -> Self {
        self.arguments = arguments;
        self
    }

    /// Add or replace one argument.
    pub fn argument(mut self, key: impl Into<String>, value: impl Into<Argument>) -> Self {
        self.arguments.insert(key, value);
        self
    }

    /// Send `body` as-is. Arguments then go to the query string.
    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a header for this call only; it overrides a common header of the
    /// same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn from_parts(
        method: Method,
        path: &str,
        arguments: Option<Arguments>,
        body: Option<RequestBody>,
    ) -> Self {
        Self {
            method,
            path: path.to_string(),
            arguments: arguments.unwrap_or_default(),
            body,
            headers: Vec::new(),
        }
    }

    /// Build the transport request.
    ///
    /// `encoding` is only consulted when the arguments become the body.
    pub(crate) fn into_request(
        self,
        id: &str,
        base_url: &Url,
        common_headers: &HeaderMap,
        encoding: Encoding,
    ) -> Result<TransportRequest, ProxyError> {
        let mut url = resolve(base_url, &self.path)?;

        let mut headers = common_headers.clone();
        for (name, value) in &self.headers {
            let (name, value) = parse_header(name, value)?;
            headers.insert(name, value);
        }

        let body = match (self.method.carries_body(), self.body) {
            (true, None) => {
                let encoded = encode_body(&self.arguments, encoding)?;
                tracing::trace!(target: "wsproxy::encoding", invocation_id=%id, content_type=%encoded.content_type, bytes=encoded.content.len(), "arguments encoded as body");
                headers.insert(CONTENT_TYPE, content_type_value(&encoded.content_type)?);
                Some(encoded.content)
            }
            (_, body) => {
                append_query(&mut url, &encode_form(&self.arguments)?);
                match body {
                    Some(body) => {
                        match &body.content_type {
                            Some(content_type) => {
                                headers.insert(CONTENT_TYPE, content_type_value(content_type)?);
                            }
                            None if !headers.contains_key(CONTENT_TYPE) => {
                                headers.insert(
                                    CONTENT_TYPE,
                                    content_type_value(body.effective_content_type())?,
                                );
                            }
                            None => {}
                        }
                        Some(body.content)
                    }
                    None => None,
                }
            }
        };

        Ok(TransportRequest {
            id: id.to_string(),
            method: self.method,
            url,
            headers,
            body,
        })
    }
}

pub(crate) fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), ProxyError> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| ProxyError::invalid_request(format!("Invalid header name '{name}': {e}")))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|e| ProxyError::invalid_request(format!("Invalid header value for '{name}': {e}")))?;
    Ok((header_name, header_value))
}

fn content_type_value(content_type: &str) -> Result<HeaderValue, ProxyError> {
    HeaderValue::from_str(content_type)
        .map_err(|e| ProxyError::invalid_request(format!("Invalid content type '{content_type}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{normalize_base_url, parse_form};
    use crate::types::Attachment;

    fn build(invocation: Invocation, encoding: Encoding) -> Result<TransportRequest, ProxyError> {
        let base = normalize_base_url("http://example.com/api").unwrap();
        invocation.into_request("id-1", &base, &HeaderMap::new(), encoding)
    }

    fn query_pairs(request: &TransportRequest) -> Vec<(String, String)> {
        parse_form(request.url.query().unwrap_or(""))
    }

    #[test]
    fn get_arguments_follow_the_existing_query() {
        let request = build(
            Invocation::new(Method::Get, "items?x=1").argument("y", 2),
            Encoding::FormUrlEncoded,
        )
        .unwrap();
        assert_eq!(request.url.as_str(), "http://example.com/api/items?x=1&y=2");
        assert!(request.body.is_none());
        assert!(request.content_type().is_none());
    }

    #[test]
    fn lists_repeat_and_nulls_vanish_from_the_query() {
        let request = build(
            Invocation::new(Method::Delete, "items")
                .argument("id", vec![3, 1, 2])
                .argument("gone", Option::<i64>::None),
            Encoding::MultipartFormData,
        )
        .unwrap();
        let pairs = query_pairs(&request);
        let ids: Vec<_> = pairs
            .iter()
            .filter(|(k, _)| k == "id")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(ids, ["3", "1", "2"]);
        assert!(pairs.iter().all(|(k, _)| k != "gone"));
    }

    #[test]
    fn post_arguments_become_a_form_body() {
        let request = build(
            Invocation::new(Method::Post, "items").argument("name", "a b"),
            Encoding::FormUrlEncoded,
        )
        .unwrap();
        assert_eq!(request.body.as_deref(), Some(&b"name=a%20b"[..]));
        assert_eq!(
            request.content_type(),
            Some("application/x-www-form-urlencoded")
        );
        assert!(request.url.query().is_none());
    }

    #[test]
    fn post_arguments_honor_multipart_mode() {
        let request = build(
            Invocation::new(Method::Patch, "items").argument("name", "a"),
            Encoding::MultipartFormData,
        )
        .unwrap();
        assert!(
            request
                .content_type()
                .unwrap()
                .starts_with("multipart/form-data; boundary=wsproxy-")
        );
    }

    #[test]
    fn explicit_body_skips_argument_encoding() {
        for encoding in [Encoding::FormUrlEncoded, Encoding::MultipartFormData] {
            let request = build(
                Invocation::new(Method::Put, "items/1")
                    .argument("version", 4)
                    .body(RequestBody::new(b"raw".to_vec()).with_content_type("text/plain")),
                encoding,
            )
            .unwrap();
            assert_eq!(request.body.as_deref(), Some(&b"raw"[..]));
            assert_eq!(request.content_type(), Some("text/plain"));
            assert_eq!(request.url.query(), Some("version=4"));
        }
    }

    #[test]
    fn untyped_bodies_are_octet_streams_unless_a_header_says_otherwise() {
        let request = build(
            Invocation::new(Method::Post, "blob").body(b"\x00\x01".to_vec()),
            Encoding::FormUrlEncoded,
        )
        .unwrap();
        assert_eq!(request.content_type(), Some("application/octet-stream"));

        let request = build(
            Invocation::new(Method::Post, "blob")
                .body(b"<a/>".to_vec())
                .header("Content-Type", "application/xml"),
            Encoding::FormUrlEncoded,
        )
        .unwrap();
        assert_eq!(request.content_type(), Some("application/xml"));
    }

    #[test]
    fn encoder_content_type_wins_over_headers() {
        let request = build(
            Invocation::new(Method::Post, "items")
                .argument("a", 1)
                .header("Content-Type", "application/json"),
            Encoding::FormUrlEncoded,
        )
        .unwrap();
        assert_eq!(
            request.content_type(),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn per_request_headers_override_common_ones() {
        let base = normalize_base_url("http://example.com/").unwrap();
        let mut common = HeaderMap::new();
        common.insert("x-client", HeaderValue::from_static("common"));
        common.insert("x-tenant", HeaderValue::from_static("t1"));

        let request = Invocation::new(Method::Get, "x")
            .header("X-Client", "override")
            .into_request("id", &base, &common, Encoding::FormUrlEncoded)
            .unwrap();
        assert_eq!(request.headers["x-client"], "override");
        assert_eq!(request.headers["x-tenant"], "t1");
    }

    #[test]
    fn construction_errors_are_invalid_requests() {
        let traversal = build(Invocation::new(Method::Get, "../etc"), Encoding::FormUrlEncoded);
        assert!(matches!(traversal, Err(ProxyError::InvalidRequest(_))));

        let bad_header = build(
            Invocation::new(Method::Get, "x").header("bad name", "v"),
            Encoding::FormUrlEncoded,
        );
        assert!(matches!(bad_header, Err(ProxyError::InvalidRequest(_))));

        let attachment_in_query = build(
            Invocation::new(Method::Get, "x")
                .argument("file", Attachment::new("a.txt", "text/plain", b"a".to_vec())),
            Encoding::FormUrlEncoded,
        );
        assert!(matches!(
            attachment_in_query,
            Err(ProxyError::InvalidRequest(_))
        ));
    }

    #[test]
    fn request_carries_the_invocation_id() {
        let request = build(Invocation::new(Method::Get, "x"), Encoding::FormUrlEncoded).unwrap();
        assert_eq!(request.id, "id-1");
        assert_eq!(request.method, Method::Get);
    }
}
