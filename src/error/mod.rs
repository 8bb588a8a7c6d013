//! Error Handling Module
//!
//! This module provides the error domain of the proxy:
//! - Core error types (`ProxyError`, `TransportError`, `DecodeError`, `ErrorCategory`)
//! - Type conversions from common error types
//!
//! # Example
//!
//! ```rust
//! use wsproxy::error::{ErrorCategory, ProxyError};
//!
//! let error = ProxyError::status(404, "Not Found", None);
//! assert_eq!(error.category(), ErrorCategory::Status);
//! assert!(error.is_server_failure());
//! assert!(!error.is_transport_failure());
//! ```

mod conversions;
pub mod types;

pub use types::*;
