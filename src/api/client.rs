//! Zone API client.
//!
//! This module provides [`ZoneApi`], which turns conversion operations into
//! authenticated HTTP calls and classifies the answers.

use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::config::{ClientConfig, ZoneApiBuilder};
use super::constants::{API_KEY_HEADER, API_SECRET_HEADER, FORM_CONTENT_TYPE, PING_ROUTE};
use super::error::ApiError;
use super::file::ResponseFile;
use super::form::{self, FormParams};
use super::headers::ResponseHeaders;
use super::request::{ConversionRequest, Method};
use super::response::ApiResponse;

const HTML_PDF_ROUTE: &str = "/html/pdf";
const HTML_IMG_ROUTE: &str = "/html/img";
const URL_PDF_ROUTE: &str = "/url/pdf";
const URL_IMG_ROUTE: &str = "/url/img";
const GETFILE_ROUTE: &str = "/getfile/";
const CREDENTIALS_ROUTE: &str = "";

/// Extra parameters for a conversion that needs none.
///
/// Serializes as an empty mapping.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NoParams {}

/// Client for one PDFsquid zone.
///
/// The client holds only immutable configuration and a pooled HTTP client, so
/// it is cheap to clone and can be shared between tasks.
///
/// # Example
///
/// ```no_run
/// use pdfsquid::{NoParams, ZoneApi};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), pdfsquid::ApiError> {
/// let client = ZoneApi::new("key", "secret", "eu1")?;
/// let file = client.html_to_pdf("<h1>Hello</h1>", &NoParams::default()).await?;
/// let path = file.save_file(Path::new("./out"), None).await?;
/// println!("saved {}", path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ZoneApi {
    config: ClientConfig,
    http: Client,
    api_key: HeaderValue,
    api_secret: HeaderValue,
}

impl std::fmt::Debug for ZoneApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneApi").field("config", &self.config).finish_non_exhaustive()
    }
}

impl ZoneApi {
    /// Creates a client with default settings (HTTPS, API `v1`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidConfig`] when the credentials or zone are
    /// unusable; see [`ZoneApiBuilder::build`].
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        zone: impl Into<String>,
    ) -> Result<Self, ApiError> {
        Self::builder(api_key, api_secret, zone).build()
    }

    /// Starts configuring a client.
    #[must_use]
    pub fn builder(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        zone: impl Into<String>,
    ) -> ZoneApiBuilder {
        ZoneApiBuilder::new(api_key, api_secret, zone)
    }

    pub(crate) fn from_parts(
        config: ClientConfig,
        http: Client,
        api_key: HeaderValue,
        api_secret: HeaderValue,
    ) -> Self {
        Self {
            config,
            http,
            api_key,
            api_secret,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Converts HTML to PDF and waits for the file.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParams`] if `params` is not a mapping, and
    /// any transport or API error from the call.
    pub async fn html_to_pdf<P>(&self, html: &str, params: &P) -> Result<ResponseFile, ApiError>
    where
        P: Serialize + ?Sized,
    {
        self.convert_sync("html", html, params, HTML_PDF_ROUTE).await
    }

    /// Converts HTML to an image (PNG, JPG) and waits for the file.
    ///
    /// # Errors
    ///
    /// See [`html_to_pdf`](Self::html_to_pdf).
    pub async fn html_to_img<P>(&self, html: &str, params: &P) -> Result<ResponseFile, ApiError>
    where
        P: Serialize + ?Sized,
    {
        self.convert_sync("html", html, params, HTML_IMG_ROUTE).await
    }

    /// Renders a web page to PDF and waits for the file.
    ///
    /// # Errors
    ///
    /// See [`html_to_pdf`](Self::html_to_pdf).
    pub async fn url_to_pdf<P>(&self, url: &str, params: &P) -> Result<ResponseFile, ApiError>
    where
        P: Serialize + ?Sized,
    {
        self.convert_sync("url", url, params, URL_PDF_ROUTE).await
    }

    /// Renders a web page to an image (PNG, JPG) and waits for the file.
    ///
    /// # Errors
    ///
    /// See [`html_to_pdf`](Self::html_to_pdf).
    pub async fn url_to_img<P>(&self, url: &str, params: &P) -> Result<ResponseFile, ApiError>
    where
        P: Serialize + ?Sized,
    {
        self.convert_sync("url", url, params, URL_IMG_ROUTE).await
    }

    /// Queues an HTML to PDF conversion on the service.
    ///
    /// The response is the service's job description; fetch the result later
    /// with [`get_file`](Self::get_file).
    ///
    /// # Errors
    ///
    /// See [`html_to_pdf`](Self::html_to_pdf).
    pub async fn html_to_pdf_async<P>(&self, html: &str, params: &P) -> Result<ApiResponse, ApiError>
    where
        P: Serialize + ?Sized,
    {
        self.convert_queued("html", html, params, HTML_PDF_ROUTE).await
    }

    /// Queues an HTML to image conversion on the service.
    ///
    /// # Errors
    ///
    /// See [`html_to_pdf`](Self::html_to_pdf).
    pub async fn html_to_img_async<P>(&self, html: &str, params: &P) -> Result<ApiResponse, ApiError>
    where
        P: Serialize + ?Sized,
    {
        self.convert_queued("html", html, params, HTML_IMG_ROUTE).await
    }

    /// Queues a URL to PDF conversion on the service.
    ///
    /// # Errors
    ///
    /// See [`html_to_pdf`](Self::html_to_pdf).
    pub async fn url_to_pdf_async<P>(&self, url: &str, params: &P) -> Result<ApiResponse, ApiError>
    where
        P: Serialize + ?Sized,
    {
        self.convert_queued("url", url, params, URL_PDF_ROUTE).await
    }

    /// Queues a URL to image conversion on the service.
    ///
    /// # Errors
    ///
    /// See [`html_to_pdf`](Self::html_to_pdf).
    pub async fn url_to_img_async<P>(&self, url: &str, params: &P) -> Result<ApiResponse, ApiError>
    where
        P: Serialize + ?Sized,
    {
        self.convert_queued("url", url, params, URL_IMG_ROUTE).await
    }

    /// Downloads the output of an earlier asynchronous conversion.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParams`] when `id` contains characters that
    /// cannot appear in a conversion id, and any transport or API error.
    pub async fn get_file(&self, id: &str) -> Result<ResponseFile, ApiError> {
        if id.chars().all(|c| c == '.')
            || !id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(ApiError::invalid_params(format!("invalid conversion id {id:?}")));
        }
        let request = ConversionRequest::get(format!("{GETFILE_ROUTE}{id}")).download(true);
        self.fetch_file(&request).await
    }

    /// Returns true when the zone answers its ping route.
    ///
    /// Never fails: every error counts as "not accessible".
    pub async fn is_api_accessible(&self) -> bool {
        self.check(ConversionRequest::get(PING_ROUTE)).await
    }

    /// Returns true when the zone accepts the configured credentials.
    ///
    /// Never fails: every error counts as "not authorized".
    pub async fn is_auth_correct(&self) -> bool {
        self.check(ConversionRequest::get(CREDENTIALS_ROUTE)).await
    }

    /// Performs one call and classifies a 200 response.
    ///
    /// Download calls yield [`ApiResponse::File`]; otherwise JSON bodies are
    /// decoded and anything else is returned as text.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] when no HTTP answer was obtained
    /// - [`ApiError::Api`] for any status other than 200
    /// - [`ApiError::InvalidJson`] when a JSON body does not decode
    #[instrument(skip(self, request), fields(method = %request.method, route = %request.route))]
    pub async fn call(&self, request: ConversionRequest) -> Result<ApiResponse, ApiError> {
        let (url, headers, body) = self.execute(&request).await?;
        if request.download {
            return Ok(ApiResponse::File(self.wrap_file(headers, body)));
        }
        ApiResponse::from_document(&url, &headers, body)
    }

    async fn convert_sync<P>(
        &self,
        payload_key: &str,
        payload: &str,
        params: &P,
        route: &str,
    ) -> Result<ResponseFile, ApiError>
    where
        P: Serialize + ?Sized,
    {
        let request = conversion_request(payload_key, payload, params, route)?
            .synchronous(true)
            .download(true);
        self.fetch_file(&request).await
    }

    async fn convert_queued<P>(
        &self,
        payload_key: &str,
        payload: &str,
        params: &P,
        route: &str,
    ) -> Result<ApiResponse, ApiError>
    where
        P: Serialize + ?Sized,
    {
        let request = conversion_request(payload_key, payload, params, route)?;
        self.call(request).await
    }

    #[instrument(skip(self, request), fields(route = %request.route))]
    async fn fetch_file(&self, request: &ConversionRequest) -> Result<ResponseFile, ApiError> {
        let (_, headers, body) = self.execute(request).await?;
        Ok(self.wrap_file(headers, body))
    }

    async fn check(&self, request: ConversionRequest) -> bool {
        match self.call(request).await {
            Ok(_) => true,
            Err(error) => {
                debug!(error = %error, "health check failed");
                false
            }
        }
    }

    fn wrap_file(&self, headers: ResponseHeaders, body: Vec<u8>) -> ResponseFile {
        ResponseFile::new(headers, body).with_default_name(self.config.file_name.clone())
    }

    /// Sends the request and returns URL, headers and body of a 200 answer.
    async fn execute(
        &self,
        request: &ConversionRequest,
    ) -> Result<(String, ResponseHeaders, Vec<u8>), ApiError> {
        let url = self.config.route_url(&request.route, request.synchronous);
        debug!(method = %request.method, url = %url, params = request.params.len(), "sending request");

        let builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url).body(form::encode(&request.params)),
        };
        let response = builder
            .header(API_KEY_HEADER, self.api_key.clone())
            .header(API_SECRET_HEADER, self.api_secret.clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "transport error");
                ApiError::transport(url.clone(), e)
            })?;

        let status = response.status().as_u16();
        let headers = ResponseHeaders::from(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|e| {
                warn!(url = %url, status, error = %e, "failed reading response body");
                ApiError::transport_with_status(url.clone(), status, e)
            })?
            .to_vec();

        if status != 200 {
            let error = ApiError::api_from_body(url, status, &body);
            warn!(status, error = %error, "API error");
            return Err(error);
        }

        info!(url = %url, bytes = body.len(), "request complete");
        Ok((url, headers, body))
    }
}

/// Validates caller parameters and inserts the primary payload.
fn conversion_request<P>(
    payload_key: &str,
    payload: &str,
    params: &P,
    route: &str,
) -> Result<ConversionRequest, ApiError>
where
    P: Serialize + ?Sized,
{
    let mut params: FormParams = form::to_form_params(params)?;
    params.insert(payload_key.to_string(), payload.into());
    Ok(ConversionRequest::post(route, params))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_conversion_request_inserts_payload() {
        let request =
            conversion_request("html", "<p>x</p>", &json!({"landscape": true}), HTML_PDF_ROUTE)
                .unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.route, "/html/pdf");
        assert_eq!(request.params["html"], "<p>x</p>");
        assert_eq!(request.params["landscape"], true);
    }

    #[test]
    fn test_conversion_request_payload_wins_over_param() {
        let request =
            conversion_request("url", "https://a.test", &json!({"url": "ignored"}), URL_PDF_ROUTE)
                .unwrap();
        assert_eq!(request.params["url"], "https://a.test");
    }

    #[test]
    fn test_conversion_request_rejects_scalar_params() {
        let err = conversion_request("html", "x", "not a map", HTML_IMG_ROUTE).unwrap_err();
        assert!(matches!(err, ApiError::InvalidParams { .. }));
    }

    #[test]
    fn test_no_params_is_empty_mapping() {
        let params = form::to_form_params(&NoParams::default()).unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_get_file_rejects_path_like_id() {
        let client = ZoneApi::builder("k", "s", "zone")
            .endpoint("http://127.0.0.1:9")
            .build()
            .unwrap();
        for id in ["", "..", "../secret", "a/b", "id?x=1"] {
            let err = tokio_test::block_on(client.get_file(id)).unwrap_err();
            assert!(matches!(err, ApiError::InvalidParams { .. }), "id {id:?}: {err:?}");
        }
    }

    #[test]
    fn test_async_conversion_rejects_scalar_params_without_io() {
        let client = ZoneApi::builder("k", "s", "zone")
            .endpoint("http://127.0.0.1:9")
            .build()
            .unwrap();
        let err = tokio_test::block_on(client.url_to_img_async("https://a.test", &[1, 2])).unwrap_err();
        assert!(matches!(err, ApiError::InvalidParams { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn test_execute_sends_credentials_and_form_body() {
        use crate::test_support::socket_guard::start_mock_server_or_skip;
        use wiremock::matchers::{body_string_contains, header, method, path};
        use wiremock::{Mock, ResponseTemplate};

        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("POST"))
            .and(path("/v1/html/pdf"))
            .and(header("x-api-key", "key-1"))
            .and(header("x-api-secret", "secret-1"))
            .and(header("content-type", FORM_CONTENT_TYPE))
            .and(body_string_contains("html=%3Cb%3Ehi%3C%2Fb%3E"))
            .and(body_string_contains("margin=5"))
            .respond_with(ResponseTemplate::new(200).set_body_string("queued"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ZoneApi::builder("key-1", "secret-1", "zone")
            .endpoint(mock_server.uri())
            .build()
            .unwrap();
        let request = conversion_request("html", "<b>hi</b>", &json!({"margin": 5}), HTML_PDF_ROUTE)
            .unwrap();

        let (url, _, body) = client.execute(&request).await.unwrap();
        assert_eq!(url, format!("{}/v1/html/pdf", mock_server.uri()));
        assert_eq!(body, b"queued");
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let client = ZoneApi::new("key-123", "secret-456", "zone").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-456"));
        assert!(!debug.contains("key-123"));
    }
}
