//! Case-insensitive response header container.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use super::constants::{CONVERSION_ID_HEADER, OUTPUT_FORMAT_HEADER};

/// Response headers keyed case-insensitively.
///
/// Header names are normalized to lower case on insertion, so
/// `get("Content-Type")` and `get("content-type")` find the same entry.
/// Values that are not valid UTF-8 are reported as absent.
#[derive(Debug, Clone, Default)]
pub struct ResponseHeaders {
    inner: HeaderMap,
}

impl ResponseHeaders {
    /// Creates an empty header set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, replacing any previous value for the same name.
    ///
    /// Names or values that are not valid HTTP tokens are ignored and
    /// reported by returning `false`.
    pub fn insert(&mut self, name: &str, value: &str) -> bool {
        let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.trim().as_bytes()),
            HeaderValue::from_str(value.trim()),
        ) else {
            return false;
        };
        self.inner.insert(name, value);
        true
    }

    /// Returns the value stored under `name`, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name.to_ascii_lowercase().as_str())?.to_str().ok()
    }

    /// Returns true if a header with this name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.inner.get(CONTENT_TYPE)?.to_str().ok()
    }

    #[must_use]
    pub fn output_format(&self) -> Option<&str> {
        self.get(OUTPUT_FORMAT_HEADER)
    }

    #[must_use]
    pub fn conversion_id(&self) -> Option<&str> {
        self.get(CONVERSION_ID_HEADER)
    }

    /// Returns true when the content type announces a JSON document.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
    }

    /// Iterates over `(lower-cased name, value)` pairs with UTF-8 values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str(), v)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Borrows the underlying header map.
    #[must_use]
    pub fn as_header_map(&self) -> &HeaderMap {
        &self.inner
    }
}

impl From<HeaderMap> for ResponseHeaders {
    fn from(inner: HeaderMap) -> Self {
        Self { inner }
    }
}

impl From<&HeaderMap> for ResponseHeaders {
    fn from(inner: &HeaderMap) -> Self {
        Self {
            inner: inner.clone(),
        }
    }
}
