//! Classification of successful responses.

use serde_json::Value;

use super::error::ApiError;
use super::file::ResponseFile;
use super::headers::ResponseHeaders;

/// Decoded body of a successful (HTTP 200) call.
#[derive(Debug, Clone)]
pub enum ApiResponse {
    /// A downloaded file, returned whenever the call asked for a download.
    File(ResponseFile),
    /// A body served as `application/json`.
    Json(Value),
    /// Any other body, decoded lossily as UTF-8.
    Text(String),
}

impl ApiResponse {
    /// Classifies a 200 response that was not requested as a download.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidJson`] when the content type announces JSON
    /// but the body does not decode.
    pub(crate) fn from_document(
        url: &str,
        headers: &ResponseHeaders,
        body: Vec<u8>,
    ) -> Result<Self, ApiError> {
        if headers.is_json() {
            let value =
                serde_json::from_slice(&body).map_err(|e| ApiError::invalid_json(url, e))?;
            return Ok(Self::Json(value));
        }
        let text = match String::from_utf8(body) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };
        Ok(Self::Text(text))
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_file(self) -> Option<ResponseFile> {
        match self {
            Self::File(file) => Some(file),
            _ => None,
        }
    }
}
