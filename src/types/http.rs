//! Settings for the default `reqwest` transport.
//!
//! Only connection-level concerns live here: timeouts, the outbound proxy,
//! the user agent and redirect handling. Headers sent to the service belong to
//! the [`crate::WebServiceProxy`] builder, so they are not duplicated here.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::defaults::http::{CONNECT_TIMEOUT, REQUEST_TIMEOUT, USER_AGENT};

/// Connection settings for [`crate::transport::ReqwestTransport`].
///
/// Durations serialize as whole seconds; `None` means "no limit".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(with = "seconds")]
    pub timeout: Option<Duration>,
    #[serde(with = "seconds")]
    pub connect_timeout: Option<Duration>,
    /// Outbound proxy for every scheme, e.g. `http://proxy.local:3128`.
    pub proxy_url: Option<String>,
    pub user_agent: String,
    /// Redirects followed before giving up; `0` hands 3xx responses back to
    /// the proxy, which reports them as status errors.
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Some(REQUEST_TIMEOUT),
            connect_timeout: Some(CONNECT_TIMEOUT),
            proxy_url: None,
            user_agent: USER_AGENT.to_string(),
            max_redirects: 10,
        }
    }
}

impl HttpConfig {
    pub fn builder() -> HttpConfigBuilder {
        HttpConfigBuilder::default()
    }
}

/// Builder for [`HttpConfig`], starting from the defaults.
#[derive(Debug, Clone, Default)]
pub struct HttpConfigBuilder {
    config: HttpConfig,
}

impl HttpConfigBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Let requests run as long as the server keeps the connection open.
    pub fn no_timeouts(mut self) -> Self {
        self.config.timeout = None;
        self.config.connect_timeout = None;
        self
    }

    pub fn proxy_url(mut self, url: impl Into<String>) -> Self {
        self.config.proxy_url = Some(url.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn max_redirects(mut self, max_redirects: usize) -> Self {
        self.config.max_redirects = max_redirects;
        self
    }

    pub fn build(self) -> HttpConfig {
        self.config
    }
}

mod seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_secs))
    }
}
