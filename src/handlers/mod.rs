//! HTTP request handlers.

pub mod http;
pub mod register;

pub use http::*;
