//! `reqwest`-backed transport.

use async_trait::async_trait;
use reqwest::redirect::Policy;

use super::{HttpTransport, TransportRequest, TransportResponse};
use crate::error::{ProxyError, TransportError};
use crate::types::HttpConfig;

/// Client for [`ReqwestTransport`] built from connection settings.
///
/// Service headers are not set here; the proxy adds them to every request.
/// Redirects are bounded by `max_redirects`, and `0` turns them off.
///
/// ```rust,no_run
/// use wsproxy::types::HttpConfig;
/// use wsproxy::transport::build_http_client_from_config;
///
/// let client = build_http_client_from_config(&HttpConfig::builder().max_redirects(0).build())?;
/// # Ok::<(), wsproxy::ProxyError>(())
/// ```
pub fn build_http_client_from_config(config: &HttpConfig) -> Result<reqwest::Client, ProxyError> {
    let redirects = match config.max_redirects {
        0 => Policy::none(),
        n => Policy::limited(n),
    };
    let mut builder = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .redirect(redirects);

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(timeout) = config.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(url) = &config.proxy_url {
        let proxy = reqwest::Proxy::all(url.as_str()).map_err(|e| {
            ProxyError::configuration(format!("Invalid outbound proxy '{url}': {e}"))
        })?;
        builder = builder.proxy(proxy);
    }

    tracing::debug!(
        target: "wsproxy::transport",
        timeout = ?config.timeout,
        proxy = config.proxy_url.is_some(),
        max_redirects = config.max_redirects,
        "building reqwest client"
    );
    builder
        .build()
        .map_err(|e| ProxyError::configuration(format!("Failed to create HTTP client: {e}")))
}

/// Transport over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport with the default [`HttpConfig`].
    pub fn new() -> Result<Self, ProxyError> {
        Self::with_config(&HttpConfig::default())
    }

    pub fn with_config(config: &HttpConfig) -> Result<Self, ProxyError> {
        Ok(Self {
            client: build_http_client_from_config(config)?,
        })
    }

    /// Wrap an existing client, keeping its configuration.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method.into(), request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        tracing::trace!(target: "wsproxy::transport", id=%request.id, status, bytes=body.len(), "reqwest round-trip finished");

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
