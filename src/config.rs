//! SDK-wide configuration shared by every resource API.

use crate::{hooks::Hooks, retry::RetryConfig, security::Security, Error, Result};
use std::time::Duration;

/// Known API servers, selectable by index.
pub const SERVERS: &[&str] = &["https://api.dateno.io"];

/// Version of this SDK.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding a server URL override.
pub const ENV_SERVER_URL: &str = "DATENO_SERVER_URL";

/// Environment variable holding the API key (sent as a query parameter).
pub const ENV_API_KEY: &str = "DATENO_APIKEY";

/// Configuration of one SDK instance.
///
/// Built once by [`crate::DatenoBuilder`] and shared behind an `Arc` by all
/// resource APIs and hook contexts.
#[derive(Debug)]
pub struct SdkConfiguration {
    /// The HTTP transport.
    pub client: reqwest::Client,

    /// `true` if the caller handed in `client`; the SDK never releases it.
    pub client_supplied: bool,

    /// Explicit base URL; wins over `server_idx` when non-empty.
    pub server_url: Option<String>,

    /// Index into [`SERVERS`].
    pub server_idx: Option<usize>,

    /// Default per-attempt timeout.
    pub timeout: Option<Duration>,

    pub security: Option<Security>,

    /// Default retry policy; `None` means calls run once.
    pub retry_config: Option<RetryConfig>,

    pub hooks: Hooks,

    pub user_agent: String,

    pub sdk_version: String,
}

impl SdkConfiguration {
    /// Resolves the base URL for requests.
    ///
    /// A non-empty `server_url` is returned with a single trailing `/`
    /// removed; otherwise `SERVERS[server_idx]` (index 0 when unset).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the server index is out of range.
    pub fn get_server_details(&self) -> Result<String> {
        if let Some(url) = self.server_url.as_deref().filter(|u| !u.is_empty()) {
            return Ok(url.strip_suffix('/').unwrap_or(url).to_string());
        }

        let idx = self.server_idx.unwrap_or(0);
        SERVERS.get(idx).map(|s| s.to_string()).ok_or_else(|| {
            Error::Configuration(format!(
                "server index {} out of range ({} servers known)",
                idx,
                SERVERS.len()
            ))
        })
    }
}

impl Drop for SdkConfiguration {
    fn drop(&mut self) {
        if self.client_supplied {
            tracing::debug!("Leaving supplied HTTP client to its owner");
        } else {
            tracing::debug!("Releasing owned HTTP client");
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn config(server_url: Option<&str>, server_idx: Option<usize>) -> SdkConfiguration {
        SdkConfiguration {
            client: reqwest::Client::new(),
            client_supplied: true,
            server_url: server_url.map(String::from),
            server_idx,
            timeout: None,
            security: None,
            retry_config: None,
            hooks: Hooks::new(),
            user_agent: "dateno-sdk-rust/test".to_string(),
            sdk_version: SDK_VERSION.to_string(),
        }
    }

    #[test]
    fn server_url_override_strips_one_trailing_slash() {
        let cfg = config(Some("https://example.invalid/"), Some(0));
        assert_eq!(cfg.get_server_details().unwrap(), "https://example.invalid");

        let cfg = config(Some("https://example.invalid"), Some(0));
        assert_eq!(cfg.get_server_details().unwrap(), "https://example.invalid");

        let cfg = config(Some("https://example.invalid//"), None);
        assert_eq!(
            cfg.get_server_details().unwrap(),
            "https://example.invalid/"
        );
    }

    #[test]
    fn empty_server_url_falls_back_to_server_list() {
        let cfg = config(Some(""), Some(0));
        assert_eq!(cfg.get_server_details().unwrap(), SERVERS[0]);

        let cfg = config(None, None);
        assert_eq!(cfg.get_server_details().unwrap(), SERVERS[0]);
    }

    #[test]
    fn invalid_server_index_is_configuration_error() {
        let cfg = config(Some(""), Some(999));
        assert!(matches!(
            cfg.get_server_details(),
            Err(Error::Configuration(_))
        ));
    }
}
