//! User-Agent string sent with every API request.

use crate::api::constants::CLIENT_VERSION;

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://docs.pdfsquid.com/";

/// Default User-Agent for API requests (identifies the client and version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    format!("pdfsquid-rust/{CLIENT_VERSION} (+{PROJECT_UA_URL})")
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_carries_crate_version() {
        let ua = default_user_agent();
        assert_eq!(
            CLIENT_VERSION,
            ua.strip_prefix("pdfsquid-rust/")
                .and_then(|s| s.split(' ').next())
                .expect("UA has version"),
            "UA must contain crate version"
        );
        assert_eq!(CLIENT_VERSION, env!("CARGO_PKG_VERSION"));
        assert!(ua.contains(PROJECT_UA_URL), "UA must contain project URL: {ua}");
    }
}
