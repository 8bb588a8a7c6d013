//! Builder for [`WebServiceProxy`].

use std::sync::Arc;

use reqwest::header::HeaderMap;
use tokio::runtime::Handle;

use super::callback::CallbackContext;
use super::invocation::parse_header;
use super::{ProxyInner, WebServiceProxy};
use crate::encoding::normalize_base_url;
use crate::error::ProxyError;
use crate::interceptor::{HttpInterceptor, LoggingInterceptor};
use crate::transport::HttpTransport;
use crate::types::{AtomicEncoding, Encoding};

/// Configures a [`WebServiceProxy`].
///
/// # Example
/// ```rust,no_run
/// use std::sync::Arc;
/// use wsproxy::prelude::*;
///
/// # #[tokio::main] async fn main() -> Result<(), ProxyError> {
/// let transport = Arc::new(ReqwestTransport::new()?);
/// let proxy = WebServiceProxy::builder(transport, "https://example.com/api/")
///     .encoding(Encoding::MultipartFormData)
///     .header("Authorization", "Bearer token")
///     .with_logging()
///     .build()?;
/// # Ok(()) }
/// ```
pub struct WebServiceProxyBuilder {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    encoding: Encoding,
    headers: Vec<(String, String)>,
    interceptors: Vec<Arc<dyn HttpInterceptor>>,
    callback_context: CallbackContext,
    runtime: Option<Handle>,
}

impl WebServiceProxyBuilder {
    pub(crate) fn new(transport: Arc<dyn HttpTransport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            encoding: Encoding::default(),
            headers: Vec::new(),
            interceptors: Vec::new(),
            callback_context: CallbackContext::default(),
            runtime: None,
        }
    }

    /// Initial encoding mode for argument bodies.
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// A header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Interceptors run in registration order.
    pub fn interceptor(mut self, interceptor: Arc<dyn HttpInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn with_logging(self) -> Self {
        self.interceptor(Arc::new(LoggingInterceptor))
    }

    pub fn callback_context(mut self, context: CallbackContext) -> Self {
        self.callback_context = context;
        self
    }

    /// Runtime that runs invocations and, for [`CallbackContext::Runtime`],
    /// result handlers. Defaults to the runtime `build` is called from.
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub fn build(self) -> Result<WebServiceProxy, ProxyError> {
        let base_url = normalize_base_url(&self.base_url)?;

        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let (name, value) = parse_header(name, value)
                .map_err(|e| ProxyError::configuration(e.to_string()))?;
            headers.insert(name, value);
        }

        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|e| {
                ProxyError::configuration(format!("No tokio runtime available: {e}"))
            })?,
        };

        tracing::debug!(target: "wsproxy::http", base_url=%base_url, encoding=?self.encoding, interceptors=self.interceptors.len(), "web service proxy created");

        Ok(WebServiceProxy {
            inner: Arc::new(ProxyInner {
                transport: self.transport,
                base_url,
                encoding: AtomicEncoding::new(self.encoding),
                headers,
                interceptors: self.interceptors,
                callback_context: self.callback_context,
                runtime,
            }),
        })
    }
}

impl std::fmt::Debug for WebServiceProxyBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebServiceProxyBuilder")
            .field("base_url", &self.base_url)
            .field("encoding", &self.encoding)
            .field("headers", &self.headers.len())
            .field("interceptors", &self.interceptors.len())
            .field("callback_context", &self.callback_context)
            .finish_non_exhaustive()
    }
}
