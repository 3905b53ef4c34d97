//! HTTP networking module
//!
//! Provides the HTTP client used to reach the upstream places API.

mod client;
mod request;

pub use client::HttpClient;
pub use request::{ApiRequest, ApiResponse};
