//! Utility modules for wsproxy

pub mod mime;
