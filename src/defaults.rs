//! Default Configuration Values
//!
//! Centralizes the default values used by the proxy and its default transport.

use std::time::Duration;

/// HTTP client default configurations
pub mod http {
    use super::*;

    /// Default request timeout for HTTP requests
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Default connection timeout for establishing HTTP connections
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default User-Agent string for HTTP requests
    pub const USER_AGENT: &str = concat!("wsproxy/", env!("CARGO_PKG_VERSION"));
}

/// Content types used when building requests
pub mod content_types {
    pub const FORM_URL_ENCODED: &str = "application/x-www-form-urlencoded";
    pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";
    pub const OCTET_STREAM: &str = "application/octet-stream";
    pub const JSON: &str = "application/json";
}

/// Multipart boundary generation
pub mod multipart {
    /// Prefix of every generated boundary token
    pub const BOUNDARY_PREFIX: &str = "wsproxy-";

    /// Number of random alphanumeric characters after the prefix
    pub const BOUNDARY_RANDOM_LEN: usize = 32;

    /// Boundary regenerations allowed before giving up on a body
    pub const MAX_BOUNDARY_ATTEMPTS: usize = 8;
}
