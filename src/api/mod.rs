//! Zone API client for HTML/URL to PDF and image conversion.
//!
//! This module provides everything needed to talk to a PDFsquid zone: the
//! [`ZoneApi`] client and its builder, the request and response types, and
//! [`ResponseFile`] for handling converted documents.
//!
//! # Features
//!
//! - Synchronous conversions returning the file directly
//! - Asynchronous (queued) conversions returning a job description
//! - Fetching queued results by conversion id
//! - Liveness and credential checks that report a plain `bool`
//! - Relaying files to a browser or saving them to disk
//!
//! # Example
//!
//! ```no_run
//! use pdfsquid::ZoneApi;
//! use serde_json::json;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ZoneApi::new("key", "secret", "eu1")?;
//! if client.is_api_accessible().await {
//!     let file = client
//!         .url_to_pdf("https://example.com", &json!({"page_size": "A4"}))
//!         .await?;
//!     file.save_file(Path::new("."), None).await?;
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
pub mod constants;
mod error;
mod file;
pub mod form;
mod headers;
mod request;
mod response;

pub use client::{NoParams, ZoneApi};
pub use config::{ClientConfig, ZoneApiBuilder};
pub use error::ApiError;
pub use file::{Disposition, ResponseFile};
pub use form::FormParams;
pub use headers::ResponseHeaders;
pub use request::{ConversionRequest, Method};
pub use response::ApiResponse;

// Note: no module-local Result alias. Use `Result<T, ApiError>` explicitly.
