//! Downloaded conversion output.
//!
//! [`ResponseFile`] keeps the bytes of a converted document together with the
//! response headers describing it. It can be relayed to a browser as an
//! attachment or inline response, or written to disk under the conversion id.

use std::fmt;
use std::path::{Path, PathBuf};

use reqwest::header::{
    CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE, EXPIRES, HeaderMap,
    HeaderName, HeaderValue, PRAGMA,
};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument};

use super::constants::{CONVERSION_ID_HEADER, OUTPUT_FORMAT_HEADER};
use super::error::ApiError;
use super::headers::ResponseHeaders;

/// Content type used when the service did not report one.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// How a browser should present a relayed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Offer the file as a download.
    Attachment,
    /// Display the file in the browser.
    Inline,
}

impl Disposition {
    fn as_str(self) -> &'static str {
        match self {
            Self::Attachment => "attachment",
            Self::Inline => "inline",
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A converted file returned by a synchronous conversion or `get_file`.
#[derive(Debug, Clone)]
pub struct ResponseFile {
    headers: ResponseHeaders,
    body: Vec<u8>,
    default_name: Option<String>,
}

impl ResponseFile {
    /// Wraps downloaded headers and body.
    #[must_use]
    pub fn new(headers: ResponseHeaders, body: Vec<u8>) -> Self {
        Self {
            headers,
            body,
            default_name: None,
        }
    }

    /// Sets the name used when no explicit name is passed to the emit and
    /// save methods. Without one, the conversion id is used.
    #[must_use]
    pub fn with_default_name(mut self, name: Option<String>) -> Self {
        self.default_name = name.filter(|n| !n.trim().is_empty());
        self
    }

    /// Raw file bytes.
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.body
    }

    /// Consumes the wrapper and returns the file bytes.
    #[must_use]
    pub fn into_raw(self) -> Vec<u8> {
        self.body
    }

    /// File format reported by the service, lower-cased (`pdf`, `png`, `jpg`).
    #[must_use]
    pub fn file_format(&self) -> Option<String> {
        self.headers.output_format().map(str::to_ascii_lowercase)
    }

    #[must_use]
    pub fn conversion_id(&self) -> Option<&str> {
        self.headers.conversion_id()
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.content_type()
    }

    #[must_use]
    pub fn headers(&self) -> &ResponseHeaders {
        &self.headers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Resolves `{name}.{format}` for emitting or saving.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingHeader`] when the output format is unknown,
    /// or when no name was given and the conversion id is unknown.
    pub fn file_name(&self, file_name: Option<&str>) -> Result<String, ApiError> {
        let extension = self
            .file_format()
            .map(|f| sanitize_component(&f))
            .filter(|f| !f.is_empty())
            .ok_or_else(|| ApiError::missing_header(OUTPUT_FORMAT_HEADER))?;
        let stem = file_name
            .filter(|n| !n.trim().is_empty())
            .or(self.default_name.as_deref())
            .or_else(|| self.conversion_id())
            .ok_or_else(|| ApiError::missing_header(CONVERSION_ID_HEADER))?;
        Ok(format!("{}.{extension}", sanitize_component(stem)))
    }

    /// Builds the response headers for relaying the file to a browser.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingHeader`] when the file name cannot be
    /// resolved (see [`file_name`](Self::file_name)).
    pub fn http_headers(
        &self,
        disposition: Disposition,
        file_name: Option<&str>,
    ) -> Result<HeaderMap, ApiError> {
        let name = self.file_name(file_name)?;
        let content_type = self
            .content_type()
            .and_then(|ct| HeaderValue::from_str(ct).ok())
            .unwrap_or(HeaderValue::from_static(FALLBACK_CONTENT_TYPE));
        // The stem is sanitized, so it is always a valid header value.
        let disposition_value = HeaderValue::from_str(&format!("{disposition}; filename={name}"))
            .unwrap_or(HeaderValue::from_static("attachment"));

        let mut headers = HeaderMap::new();
        headers.insert(PRAGMA, HeaderValue::from_static("public"));
        headers.insert(EXPIRES, HeaderValue::from_static("0"));
        headers.insert(
            CACHE_CONTROL,
            HeaderValue::from_static("must-revalidate, post-check=0, pre-check=0"),
        );
        headers.append(CACHE_CONTROL, HeaderValue::from_static("private"));
        headers.insert(CONTENT_TYPE, content_type);
        headers.insert(CONTENT_DISPOSITION, disposition_value);
        headers.insert(
            HeaderName::from_static("content-transfer-encoding"),
            HeaderValue::from_static("binary"),
        );
        headers.insert(CONTENT_LENGTH, HeaderValue::from(self.body.len()));
        Ok(headers)
    }

    /// Writes headers and body to `writer` as an attachment download.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingHeader`] when the file cannot be named and
    /// [`ApiError::Io`] when writing fails.
    pub async fn download_as_attachment<W>(
        &self,
        writer: &mut W,
        file_name: Option<&str>,
    ) -> Result<(), ApiError>
    where
        W: AsyncWrite + Unpin,
    {
        self.emit(writer, Disposition::Attachment, file_name).await
    }

    /// Writes headers and body to `writer` for display in the browser.
    ///
    /// # Errors
    ///
    /// Same as [`download_as_attachment`](Self::download_as_attachment).
    pub async fn download_inline<W>(
        &self,
        writer: &mut W,
        file_name: Option<&str>,
    ) -> Result<(), ApiError>
    where
        W: AsyncWrite + Unpin,
    {
        self.emit(writer, Disposition::Inline, file_name).await
    }

    /// Writes a CGI-style header block, a blank line and the body.
    ///
    /// # Errors
    ///
    /// Same as [`download_as_attachment`](Self::download_as_attachment).
    #[instrument(level = "debug", skip(self, writer), fields(bytes = self.body.len()))]
    pub async fn emit<W>(
        &self,
        writer: &mut W,
        disposition: Disposition,
        file_name: Option<&str>,
    ) -> Result<(), ApiError>
    where
        W: AsyncWrite + Unpin,
    {
        let headers = self.http_headers(disposition, file_name)?;

        let mut head = Vec::with_capacity(256);
        for (name, value) in &headers {
            head.extend_from_slice(name.as_str().as_bytes());
            head.extend_from_slice(b": ");
            head.extend_from_slice(value.as_bytes());
            head.extend_from_slice(b"\r\n");
        }
        head.extend_from_slice(b"\r\n");

        let stream = Path::new("<response stream>");
        writer
            .write_all(&head)
            .await
            .map_err(|e| ApiError::io(stream, e))?;
        writer
            .write_all(&self.body)
            .await
            .map_err(|e| ApiError::io(stream, e))?;
        writer.flush().await.map_err(|e| ApiError::io(stream, e))?;

        debug!(%disposition, "file emitted");
        Ok(())
    }

    /// Saves the file as `{dir}/{name}.{format}` and returns the path.
    ///
    /// The name is `file_name` when given, else the client's default file
    /// name, else the conversion id. An existing file is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingHeader`] when the file cannot be named and
    /// [`ApiError::Io`] when writing fails.
    #[instrument(skip(self, dir), fields(dir = %dir.display()))]
    pub async fn save_file(&self, dir: &Path, file_name: Option<&str>) -> Result<PathBuf, ApiError> {
        let path = dir.join(self.file_name(file_name)?);
        tokio::fs::write(&path, &self.body)
            .await
            .map_err(|e| ApiError::io(path.clone(), e))?;

        info!(path = %path.display(), bytes = self.body.len(), "file saved");
        Ok(path)
    }
}

/// Replaces characters that could escape the target directory or break a
/// header value.
fn sanitize_component(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | ';' => '_',
            c if c.is_control() || !c.is_ascii() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        sanitized
    }
}
