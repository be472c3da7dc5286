//! Client configuration and construction.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::HeaderValue;
use tracing::debug;
use url::Url;

use super::client::ZoneApi;
use super::constants::{
    API_DOMAIN, CONNECT_TIMEOUT_SECS, DEFAULT_API_VERSION, PING_ROUTE, READ_TIMEOUT_SECS,
    SYNC_SUFFIX,
};
use super::error::ApiError;
use crate::user_agent;

/// Immutable settings of a [`ZoneApi`] client.
///
/// `Debug` output never includes the API key or secret.
#[derive(Clone)]
pub struct ClientConfig {
    pub(crate) api_key: String,
    pub(crate) api_secret: String,
    pub(crate) zone: String,
    pub(crate) ssl: bool,
    pub(crate) api_version: String,
    pub(crate) endpoint: Option<String>,
    pub(crate) file_name: Option<String>,
    pub(crate) connect_timeout: Duration,
    pub(crate) read_timeout: Duration,
}

impl ClientConfig {
    fn new(api_key: String, api_secret: String, zone: String) -> Self {
        Self {
            api_key,
            api_secret,
            zone,
            ssl: true,
            api_version: DEFAULT_API_VERSION.to_string(),
            endpoint: None,
            file_name: None,
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn zone(&self) -> &str {
        &self.zone
    }

    #[must_use]
    pub fn ssl(&self) -> bool {
        self.ssl
    }

    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Name given to downloaded files when the caller does not pick one.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Scheme and host every route is appended to.
    #[must_use]
    pub fn base_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => {
                let scheme = if self.ssl { "https" } else { "http" };
                format!("{scheme}://{}.{API_DOMAIN}", self.zone)
            }
        }
    }

    /// Full URL for `route`.
    ///
    /// `ping` is served at the host root, every other route below the API
    /// version. Synchronous conversions get a `/sync` suffix.
    #[must_use]
    pub fn route_url(&self, route: &str, synchronous: bool) -> String {
        let mut url = self.base_url();
        url.push('/');
        if route != PING_ROUTE {
            url.push_str(&self.api_version);
        }
        url.push_str(route);
        if synchronous {
            url.push_str(SYNC_SUFFIX);
        }
        url
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .field("zone", &self.zone)
            .field("ssl", &self.ssl)
            .field("api_version", &self.api_version)
            .field("endpoint", &self.endpoint)
            .field("file_name", &self.file_name)
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .finish()
    }
}

/// Builder for [`ZoneApi`].
///
/// # Example
///
/// ```no_run
/// use pdfsquid::ZoneApi;
///
/// # fn example() -> Result<(), pdfsquid::ApiError> {
/// let client = ZoneApi::builder("key", "secret", "eu1")
///     .api_version("v1")
///     .file_name("report")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ZoneApiBuilder {
    config: ClientConfig,
}

impl ZoneApiBuilder {
    pub(crate) fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        zone: impl Into<String>,
    ) -> Self {
        Self {
            config: ClientConfig::new(api_key.into(), api_secret.into(), zone.into()),
        }
    }

    /// Use HTTPS (the default) or plain HTTP.
    #[must_use]
    pub fn ssl(mut self, ssl: bool) -> Self {
        self.config.ssl = ssl;
        self
    }

    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api_version = version.into();
        self
    }

    /// Sends requests to `endpoint` instead of `{scheme}://{zone}.pdfsquid.com`.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = Some(endpoint.into());
        self
    }

    /// Default name for downloaded files, used instead of the conversion id.
    #[must_use]
    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.config.file_name = Some(file_name.into());
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    /// Validates the configuration and builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidConfig`] when the credentials cannot be sent
    /// as header values, the zone is not a single DNS label, the endpoint is
    /// not a valid URL, or the HTTP client cannot be constructed.
    pub fn build(self) -> Result<ZoneApi, ApiError> {
        let config = self.config;

        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| ApiError::invalid_config("API key is not a valid header value"))?;
        key.set_sensitive(true);
        let mut secret = HeaderValue::from_str(&config.api_secret)
            .map_err(|_| ApiError::invalid_config("API secret is not a valid header value"))?;
        secret.set_sensitive(true);

        if !is_dns_label(&config.zone) {
            return Err(ApiError::invalid_config(format!(
                "zone {:?} is not a single DNS label",
                config.zone
            )));
        }

        let base_url = config.base_url();
        Url::parse(&base_url)
            .map_err(|e| ApiError::invalid_config(format!("invalid base URL {base_url}: {e}")))?;

        let http = build_http_client(config.connect_timeout, config.read_timeout)
            .map_err(|e| ApiError::invalid_config(format!("HTTP client construction failed: {e}")))?;

        debug!(config = ?config, "zone API client configured");
        Ok(ZoneApi::from_parts(config, http, key, secret))
    }
}

/// Zones become the left-most host label, so `eu1/x` or `a.evil.test` must
/// never reach URL construction.
fn is_dns_label(zone: &str) -> bool {
    !zone.is_empty()
        && zone.len() <= 63
        && !zone.starts_with('-')
        && !zone.ends_with('-')
        && zone.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

fn build_http_client(
    connect_timeout: Duration,
    read_timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(read_timeout)
        .gzip(true)
        .user_agent(user_agent::default_user_agent())
        .build()
}
