//! # wsproxy - A Web Service Invocation Proxy
//!
//! `wsproxy` turns a method, a path relative to a fixed base URL and a flat set
//! of named arguments into a fully-formed HTTP request, submits it through an
//! injected transport, and delivers exactly one outcome to a completion handler.
#![deny(unsafe_code)]

//! ## Features
//!
//! - **Injectable Transport**: any [`transport::HttpTransport`] can execute requests;
//!   [`transport::ReqwestTransport`] is provided over `reqwest`.
//! - **Flat Argument Model**: arguments are scalars, nulls, attachments or lists of those,
//!   encoded as URL-encoded forms, query strings or multipart bodies.
//! - **One-Shot Completion**: every invocation resolves its handler exactly once,
//!   including on cancellation and on request-construction failures.
//! - **Pluggable Decoding**: JSON and raw bytes by default, per-call decoders otherwise.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wsproxy::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let proxy = WebServiceProxy::with_reqwest("https://example.com/api/")?;
//!
//!     let arguments = Arguments::new()
//!         .with("name", "héllo")
//!         .with("tags", vec!["a", "b"]);
//!
//!     let value = proxy
//!         .fetch(Invocation::new(Method::Get, "greetings").arguments(arguments))
//!         .await?;
//!     println!("{value:?}");
//!
//!     Ok(())
//! }
//! ```

pub mod decode;
pub mod defaults;
pub mod encoding;
pub mod error;
pub mod interceptor;
pub mod proxy;
pub mod transport;
pub mod types;
pub mod utils;

pub use error::{DecodeError, ErrorCategory, ProxyError, TransportError, TransportErrorKind};
pub use proxy::{
    CallbackContext, CallbackQueue, CallbackSender, Invocation, InvocationState, InvocationTask, WebServiceProxy,
    WebServiceProxyBuilder,
};

/// Commonly used types, re-exported for glob import.
pub mod prelude {
    pub use crate::decode::{DefaultDecoder, JsonDecoder, ResponseDecoder, ResponseValue};
    pub use crate::error::{
        DecodeError, ErrorCategory, ProxyError, TransportError, TransportErrorKind,
    };
    pub use crate::interceptor::{HttpInterceptor, HttpRequestContext, LoggingInterceptor};
    pub use crate::proxy::{
        CallbackContext, CallbackQueue, Invocation, InvocationState, InvocationTask,
        WebServiceProxy, WebServiceProxyBuilder,
    };
    pub use crate::transport::{
        HttpTransport, ReqwestTransport, TransportRequest, TransportResponse,
    };
    pub use crate::types::{
        Argument, Arguments, Attachment, Encoding, HttpConfig, Method, RequestBody, Value,
    };
}
