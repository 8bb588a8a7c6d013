//! Core data types: methods, encodings, arguments, bodies and HTTP configuration.

mod argument;
mod attachment;
mod body;
mod encoding;
mod http;
mod method;

pub use argument::{Argument, Arguments, Value};
pub use attachment::Attachment;
pub use body::RequestBody;
pub use encoding::{AtomicEncoding, Encoding};
pub use http::{HttpConfig, HttpConfigBuilder};
pub use method::Method;
