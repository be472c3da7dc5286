//! Error type for the zone API client.
//!
//! Every failure a caller can observe, from misuse of the parameter argument
//! to a refused connection or a non-200 answer from the service, is reported
//! as one [`ApiError`]. The accessors give the uniform view (HTTP status,
//! service-reported error and code, transport error text) regardless of the
//! variant.

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while talking to the zone API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The extra parameters did not serialize to a key/value mapping.
    #[error("invalid parameters: {reason}")]
    InvalidParams {
        /// What was passed instead of a mapping.
        reason: String,
    },

    /// The client could not be configured (bad credentials encoding, endpoint
    /// or HTTP client settings).
    #[error("invalid client configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS, timeout).
    #[error("HTTP error calling {url}: {source}")]
    Transport {
        /// The URL that was being called.
        url: String,
        /// HTTP status, when the response head arrived before the failure.
        status: Option<u16>,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a status other than 200.
    #[error("API error: HTTP {status} from {url}{}", service_detail(.error.as_deref(), .error_code.as_ref()))]
    Api {
        /// The URL that was called.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// Error message reported in the JSON body, if any.
        error: Option<String>,
        /// Error code reported in the JSON body, if any.
        error_code: Option<Value>,
    },

    /// A 200 response advertised JSON but the body did not decode.
    #[error("invalid JSON in response from {url}: {source}")]
    InvalidJson {
        /// The URL that was called.
        url: String,
        /// The decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// A downloaded file is missing a header needed to name it.
    #[error("downloaded file is missing the `{name}` header")]
    MissingHeader {
        /// Lower-cased header name.
        name: &'static str,
    },

    /// File system error while saving a downloaded file.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// Creates an invalid-parameters error.
    pub fn invalid_params(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }

    /// Creates an invalid-configuration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Creates a transport error from a reqwest error.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        let status = source.status().map(|status| status.as_u16());
        Self::Transport {
            url: url.into(),
            status,
            source,
        }
    }

    /// Creates a transport error for a response whose body could not be read
    /// after the status line arrived.
    pub fn transport_with_status(
        url: impl Into<String>,
        status: u16,
        source: reqwest::Error,
    ) -> Self {
        Self::Transport {
            url: url.into(),
            status: Some(status),
            source,
        }
    }

    /// Creates an API status error without structured details.
    pub fn api(url: impl Into<String>, status: u16) -> Self {
        Self::Api {
            url: url.into(),
            status,
            error: None,
            error_code: None,
        }
    }

    /// Creates an API status error from a response body.
    ///
    /// The body is inspected for a JSON object carrying `error` and
    /// `error_code`. Malformed JSON, non-object JSON and falsy values
    /// (`null`, `false`, `0`, `""`) all leave the fields empty.
    pub fn api_from_body(url: impl Into<String>, status: u16, body: &[u8]) -> Self {
        let (error, error_code) = parse_error_body(body);
        Self::Api {
            url: url.into(),
            status,
            error,
            error_code,
        }
    }

    /// Creates an invalid-JSON error.
    pub fn invalid_json(url: impl Into<String>, source: serde_json::Error) -> Self {
        Self::InvalidJson {
            url: url.into(),
            source,
        }
    }

    /// Creates a missing-header error.
    #[must_use]
    pub fn missing_header(name: &'static str) -> Self {
        Self::MissingHeader { name }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// HTTP status associated with the failure, when one was obtained.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::InvalidJson { .. } => Some(200),
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Error message reported by the service in the response body.
    #[must_use]
    pub fn service_error(&self) -> Option<&str> {
        match self {
            Self::Api { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    /// Error code reported by the service in the response body.
    #[must_use]
    pub fn service_error_code(&self) -> Option<&Value> {
        match self {
            Self::Api { error_code, .. } => error_code.as_ref(),
            _ => None,
        }
    }

    /// Transport-level error text, for network failures.
    #[must_use]
    pub fn transport_error(&self) -> Option<String> {
        match self {
            Self::Transport { source, .. } => Some(source.to_string()),
            _ => None,
        }
    }

    /// Returns true when the request never produced an HTTP answer.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

fn parse_error_body(body: &[u8]) -> (Option<String>, Option<Value>) {
    if body.is_empty() {
        return (None, None);
    }
    let Ok(Value::Object(fields)) = serde_json::from_slice::<Value>(body) else {
        return (None, None);
    };

    let error = fields
        .get("error")
        .filter(|v| is_truthy(v))
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });
    let error_code = fields.get("error_code").filter(|v| is_truthy(v)).cloned();
    (error, error_code)
}

/// Mirrors the service's loose notion of "set": empty and zero values count
/// as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn service_detail(error: Option<&str>, error_code: Option<&Value>) -> String {
    match (error, error_code) {
        (Some(error), Some(code)) => format!(": {error} (code {code})"),
        (Some(error), None) => format!(": {error}"),
        (None, Some(code)) => format!(" (code {code})"),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_error_from_json_body_exposes_fields() {
        let error = ApiError::api_from_body(
            "https://zone.pdfsquid.com/v1/html/pdf/sync",
            400,
            br#"{"error":"bad input","error_code":42}"#,
        );
        assert_eq!(error.http_status(), Some(400));
        assert_eq!(error.service_error(), Some("bad input"));
        assert_eq!(error.service_error_code(), Some(&json!(42)));

        let msg = error.to_string();
        assert!(msg.contains("400"), "Expected status in: {msg}");
        assert!(msg.contains("bad input"), "Expected error in: {msg}");
        assert!(msg.contains("42"), "Expected code in: {msg}");
    }

    #[test]
    fn test_api_error_malformed_body_leaves_fields_empty() {
        let error = ApiError::api_from_body("https://z.pdfsquid.com/v1", 502, b"<html>bad gateway");
        assert_eq!(error.http_status(), Some(502));
        assert!(error.service_error().is_none());
        assert!(error.service_error_code().is_none());
        assert_eq!(error.to_string(), "API error: HTTP 502 from https://z.pdfsquid.com/v1");
    }

    #[test]
    fn test_api_error_non_object_json_leaves_fields_empty() {
        let error = ApiError::api_from_body("u", 500, br#"["error"]"#);
        assert!(error.service_error().is_none());
        assert!(error.service_error_code().is_none());
    }

    #[test]
    fn test_api_error_falsy_values_are_absent() {
        let error = ApiError::api_from_body("u", 401, br#"{"error":"","error_code":0}"#);
        assert!(error.service_error().is_none());
        assert!(error.service_error_code().is_none());

        let error = ApiError::api_from_body("u", 401, br#"{"error":null,"error_code":"E_AUTH"}"#);
        assert!(error.service_error().is_none());
        assert_eq!(error.service_error_code(), Some(&json!("E_AUTH")));
    }

    #[test]
    fn test_api_error_empty_body() {
        let error = ApiError::api_from_body("u", 404, b"");
        assert_eq!(error.http_status(), Some(404));
        assert!(error.service_error().is_none());
    }

    #[test]
    fn test_invalid_params_display() {
        let error = ApiError::invalid_params("expected a mapping, got a string");
        let msg = error.to_string();
        assert!(msg.starts_with("invalid parameters"), "got: {msg}");
        assert!(error.http_status().is_none());
        assert!(!error.is_transport());
    }

    #[test]
    fn test_io_error_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error = ApiError::io(PathBuf::from("/tmp/out.pdf"), io_error);
        let msg = error.to_string();
        assert!(msg.contains("/tmp/out.pdf"), "Expected path in: {msg}");
        assert!(error.http_status().is_none());
    }

    #[test]
    fn test_missing_header_display() {
        let error = ApiError::missing_header("output-format");
        assert!(error.to_string().contains("`output-format`"));
    }

    #[test]
    fn test_is_truthy_matches_loose_semantics() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!("0")));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(7)));
        assert!(is_truthy(&json!(true)));
    }
}
