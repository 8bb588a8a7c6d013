//! Web Service Proxy
//!
//! [`WebServiceProxy`] turns a method, a path beneath a fixed base URL and a
//! set of [`Arguments`] into a transport request, runs it, maps the response
//! status and decodes the body.
//!
//! Two surfaces share one execution path:
//! - `invoke` / `invoke_with_decoder` return at once and resolve a one-shot
//!   handler on the configured [`CallbackContext`]; the returned
//!   [`InvocationTask`] can cancel the call.
//! - `fetch` / `fetch_with` are plain futures; dropping one cancels the call.

mod builder;
mod callback;
mod invocation;
mod task;

pub use builder::WebServiceProxyBuilder;
pub use callback::{CallbackContext, CallbackQueue, CallbackSender};
pub use invocation::Invocation;
pub use task::{InvocationState, InvocationTask};

use std::sync::Arc;

use reqwest::Url;
use reqwest::header::HeaderMap;
use tokio::runtime::Handle;
use uuid::Uuid;

use crate::decode::{DefaultDecoder, ResponseDecoder, ResponseValue, status_error};
use crate::error::ProxyError;
use crate::interceptor::{HttpInterceptor, HttpRequestContext};
use crate::transport::{HttpTransport, ReqwestTransport, TransportRequest};
use crate::types::{Arguments, AtomicEncoding, Encoding, Method, RequestBody};

/// Invokes operations on one web service.
///
/// Cheap to clone; clones share the transport, configuration and encoding
/// mode.
#[derive(Clone)]
pub struct WebServiceProxy {
    inner: Arc<ProxyInner>,
}

pub(crate) struct ProxyInner {
    transport: Arc<dyn HttpTransport>,
    base_url: Url,
    encoding: AtomicEncoding,
    headers: HeaderMap,
    interceptors: Vec<Arc<dyn HttpInterceptor>>,
    callback_context: CallbackContext,
    runtime: Handle,
}

static_assertions::assert_impl_all!(WebServiceProxy: Send, Sync, Clone);
static_assertions::assert_impl_all!(InvocationTask: Send, Sync);

impl WebServiceProxy {
    /// Proxy with default settings, bound to the current tokio runtime.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: impl Into<String>,
    ) -> Result<Self, ProxyError> {
        Self::builder(transport, base_url).build()
    }

    pub fn builder(
        transport: Arc<dyn HttpTransport>,
        base_url: impl Into<String>,
    ) -> WebServiceProxyBuilder {
        WebServiceProxyBuilder::new(transport, base_url)
    }

    /// Proxy over a default-configured [`ReqwestTransport`].
    pub fn with_reqwest(base_url: impl Into<String>) -> Result<Self, ProxyError> {
        Self::new(Arc::new(ReqwestTransport::new()?), base_url)
    }

    /// The normalized service root; always ends with `/`.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub fn encoding(&self) -> Encoding {
        self.inner.encoding.load()
    }

    /// Change how argument bodies are encoded. Invocations already submitted
    /// keep the mode they started with.
    pub fn set_encoding(&self, encoding: Encoding) {
        self.inner.encoding.store(encoding);
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.inner.headers
    }

    /// Submit an invocation and decode the response with [`DefaultDecoder`].
    ///
    /// `result_handler` runs exactly once on the proxy's callback context,
    /// never before this method returns. If the request cannot be built the
    /// handler receives [`ProxyError::InvalidRequest`] and `None` is returned.
    ///
    /// # Example
    /// ```rust,no_run
    /// use wsproxy::prelude::*;
    ///
    /// # #[tokio::main] async fn main() -> Result<(), ProxyError> {
    /// let proxy = WebServiceProxy::with_reqwest("http://localhost:8080/math/")?;
    /// let arguments = Arguments::new().with("a", 2).with("b", 4);
    /// let task = proxy.invoke(Method::Get, "sum", Some(arguments), None, |result| {
    ///     match result {
    ///         Ok(value) => println!("sum = {:?}", value.as_json()),
    ///         Err(err) => eprintln!("failed: {err}"),
    ///     }
    /// });
    /// # let _ = task;
    /// # Ok(()) }
    /// ```
    pub fn invoke<H>(
        &self,
        method: Method,
        path: &str,
        arguments: Option<Arguments>,
        body: Option<RequestBody>,
        result_handler: H,
    ) -> Option<InvocationTask>
    where
        H: FnOnce(Result<ResponseValue, ProxyError>) + Send + 'static,
    {
        self.invoke_with_decoder(method, path, arguments, body, DefaultDecoder, result_handler)
    }

    /// Like [`invoke`](Self::invoke), decoding successful responses with
    /// `decoder`. A decoder failure reaches the handler as
    /// [`ProxyError::Decode`].
    pub fn invoke_with_decoder<T, D, H>(
        &self,
        method: Method,
        path: &str,
        arguments: Option<Arguments>,
        body: Option<RequestBody>,
        decoder: D,
        result_handler: H,
    ) -> Option<InvocationTask>
    where
        T: Send + 'static,
        D: ResponseDecoder<T> + 'static,
        H: FnOnce(Result<T, ProxyError>) + Send + 'static,
    {
        self.submit(
            Invocation::from_parts(method, path, arguments, body),
            decoder,
            result_handler,
        )
    }

    /// Submit a fully described [`Invocation`] with a one-shot handler.
    pub fn submit<T, D, H>(
        &self,
        invocation: Invocation,
        decoder: D,
        result_handler: H,
    ) -> Option<InvocationTask>
    where
        T: Send + 'static,
        D: ResponseDecoder<T> + 'static,
        H: FnOnce(Result<T, ProxyError>) + Send + 'static,
    {
        let id = new_invocation_id();
        let request = match self.inner.build_request(invocation, &id) {
            Ok(request) => request,
            Err(error) => {
                self.inner.deliver(result_handler, Err(error));
                return None;
            }
        };

        let task = InvocationTask::new(&id);
        let handle = task.clone();
        let token = task.token();
        let inner = self.inner.clone();

        self.inner.runtime.spawn(async move {
            let ctx = HttpRequestContext::for_request(&request);
            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => Err(ProxyError::Cancelled),
                result = inner.execute(&ctx, request, &decoder) => result,
            };

            let cancelled = matches!(outcome, Err(ProxyError::Cancelled));
            if cancelled {
                inner.notify_error(&ctx, &ProxyError::Cancelled);
            }
            handle.finish(cancelled);
            inner.deliver(result_handler, outcome);
        });

        Some(task)
    }

    /// Run an invocation and decode the response with [`DefaultDecoder`].
    pub async fn fetch(&self, invocation: Invocation) -> Result<ResponseValue, ProxyError> {
        self.fetch_with(invocation, DefaultDecoder).await
    }

    /// Run an invocation and decode the response with `decoder`.
    ///
    /// # Example
    /// ```rust,no_run
    /// use wsproxy::prelude::*;
    ///
    /// #[derive(serde::Deserialize)]
    /// struct Item { id: u64, name: String }
    ///
    /// # #[tokio::main] async fn main() -> Result<(), ProxyError> {
    /// let proxy = WebServiceProxy::with_reqwest("https://example.com/api/")?;
    /// let items: Vec<Item> = proxy
    ///     .fetch_with(Invocation::new(Method::Get, "items"), JsonDecoder::new())
    ///     .await?;
    /// # let _ = items;
    /// # Ok(()) }
    /// ```
    pub async fn fetch_with<T, D>(&self, invocation: Invocation, decoder: D) -> Result<T, ProxyError>
    where
        D: ResponseDecoder<T>,
    {
        let id = new_invocation_id();
        let request = self.inner.build_request(invocation, &id)?;
        let ctx = HttpRequestContext::for_request(&request);
        self.inner.execute(&ctx, request, &decoder).await
    }
}

impl std::fmt::Debug for WebServiceProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebServiceProxy")
            .field("base_url", &self.inner.base_url.as_str())
            .field("encoding", &self.encoding())
            .field("interceptors", &self.inner.interceptors.len())
            .field("callback_context", &self.inner.callback_context)
            .finish_non_exhaustive()
    }
}

fn new_invocation_id() -> String {
    Uuid::new_v4().to_string()
}

impl ProxyInner {
    fn build_request(&self, invocation: Invocation, id: &str) -> Result<TransportRequest, ProxyError> {
        let method = invocation.method();
        // One read per invocation; a concurrent set_encoding never splits a body.
        let encoding = self.encoding.load();
        invocation
            .into_request(id, &self.base_url, &self.headers, encoding)
            .inspect_err(|err| {
                tracing::warn!(target: "wsproxy::http", invocation_id=%id, method=%method, err=%err, "request construction failed");
            })
    }

    async fn execute<T, D>(
        &self,
        ctx: &HttpRequestContext,
        request: TransportRequest,
        decoder: &D,
    ) -> Result<T, ProxyError>
    where
        D: ResponseDecoder<T> + ?Sized,
    {
        let result = self.round_trip(ctx, request, decoder).await;
        match &result {
            Ok(_) => {
                tracing::debug!(target: "wsproxy::http", invocation_id=%ctx.invocation_id, "invocation completed");
            }
            Err(err) => self.notify_error(ctx, err),
        }
        result
    }

    async fn round_trip<T, D>(
        &self,
        ctx: &HttpRequestContext,
        mut request: TransportRequest,
        decoder: &D,
    ) -> Result<T, ProxyError>
    where
        D: ResponseDecoder<T> + ?Sized,
    {
        for interceptor in &self.interceptors {
            interceptor.on_before_send(ctx, &mut request)?;
        }

        tracing::debug!(target: "wsproxy::http", invocation_id=%ctx.invocation_id, method=%ctx.method, url=%ctx.url, "invoking service");
        let response = self.transport.execute(request).await?;

        for interceptor in &self.interceptors {
            interceptor.on_response(ctx, &response);
        }

        let content_type = response.content_type();
        if !(200..300).contains(&response.status) {
            return Err(status_error(response.status, &response.body, content_type));
        }

        decoder
            .decode(&response.body, content_type)
            .map_err(ProxyError::from)
    }

    fn notify_error(&self, ctx: &HttpRequestContext, err: &ProxyError) {
        tracing::debug!(target: "wsproxy::http", invocation_id=%ctx.invocation_id, url=%ctx.url, err=%err, "invocation failed");
        for interceptor in &self.interceptors {
            interceptor.on_error(ctx, err);
        }
    }

    fn deliver<T, H>(&self, result_handler: H, outcome: Result<T, ProxyError>)
    where
        T: Send + 'static,
        H: FnOnce(Result<T, ProxyError>) + Send + 'static,
    {
        self.callback_context
            .deliver(&self.runtime, move || result_handler(outcome));
    }
}
