//! Constants for the zone API client (hosts, versions, timeouts).

/// Version of this client, reported in the User-Agent header.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Domain under which every zone is served as a subdomain.
pub const API_DOMAIN: &str = "pdfsquid.com";

/// API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes, synchronous conversions of large
/// pages can take a while).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Route of the liveness check. It is served outside the versioned prefix.
pub const PING_ROUTE: &str = "ping";

/// Suffix appended to conversion routes for synchronous conversion.
pub const SYNC_SUFFIX: &str = "/sync";

/// Request content type sent with every call.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header carrying the API secret.
pub const API_SECRET_HEADER: &str = "x-api-secret";

/// Response header with the produced file format (`PDF`, `PNG`, `JPG`).
pub const OUTPUT_FORMAT_HEADER: &str = "output-format";

/// Response header with the service-assigned conversion id.
pub const CONVERSION_ID_HEADER: &str = "conversion-id";
