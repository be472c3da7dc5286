//! PDFsquid client library.
//!
//! This library is a client for the PDFsquid zone API, a hosted service that
//! converts HTML documents and web pages into PDF files and images.
//!
//! # Architecture
//!
//! - [`api`] - zone API client, request/response types, downloaded files
//!
//! A call builds an authenticated form-encoded request, sends it once (no
//! retries) and either hands back the converted file, a decoded JSON
//! document or raw text, or fails with a single [`ApiError`] type.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use api::constants::CLIENT_VERSION;
pub use api::{
    ApiError, ApiResponse, ClientConfig, ConversionRequest, Disposition, FormParams, Method,
    NoParams, ResponseFile, ResponseHeaders, ZoneApi, ZoneApiBuilder,
};
