//! Description of a single call to the zone API.

use std::fmt;

use serde_json::Value;

use super::form::FormParams;

/// HTTP method of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Health checks and file fetches; no body is sent.
    Get,
    /// Conversions; parameters travel as a form-urlencoded body.
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

/// A call to perform: method, route, sync flag, parameters and whether the
/// response body is a file to download.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub method: Method,
    /// Route below the API version, e.g. `/html/pdf`, or `ping`.
    pub route: String,
    /// Append `/sync` and wait for the conversion to finish.
    pub synchronous: bool,
    pub params: FormParams,
    /// Treat a successful body as file bytes regardless of content type.
    pub download: bool,
}

impl ConversionRequest {
    /// A body-less GET request.
    #[must_use]
    pub fn get(route: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            route: route.into(),
            synchronous: false,
            params: FormParams::new(),
            download: false,
        }
    }

    /// A POST request carrying `params` as its form body.
    #[must_use]
    pub fn post(route: impl Into<String>, params: FormParams) -> Self {
        Self {
            method: Method::Post,
            route: route.into(),
            synchronous: false,
            params,
            download: false,
        }
    }

    #[must_use]
    pub fn synchronous(mut self, synchronous: bool) -> Self {
        self.synchronous = synchronous;
        self
    }

    #[must_use]
    pub fn download(mut self, download: bool) -> Self {
        self.download = download;
        self
    }

    /// Sets a parameter, replacing any previous value under `key`.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}
