//! SDK entry point.
//!
//! The [`Dateno`] type hands out the resource APIs. Use [`DatenoBuilder`] to
//! configure and create it.

use crate::{
    apis::{DataCatalogsApi, RawDataAccessApi, SearchApi, ServiceApi, StatisticsApi},
    base::BaseSdk,
    config::{SdkConfiguration, ENV_API_KEY, ENV_SERVER_URL, SDK_VERSION},
    hooks::{Hook, Hooks},
    retry::RetryConfig,
    security::Security,
    Error, Result,
};
use std::sync::Arc;
use std::time::Duration;

/// Client for the Dateno API.
///
/// The client is designed to be reused across many calls. Cloning is cheap;
/// clones share the connection pool, configuration and hooks.
///
/// # Examples
///
/// ```no_run
/// use dateno::{retry::{BackoffStrategy, RetryConfig}, Dateno};
/// use dateno::models::{SearchParams, StatsListParams};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), dateno::Error> {
/// let sdk = Dateno::builder()
///     .api_key_query("my-key")
///     .timeout(Duration::from_secs(30))
///     .retry_config(RetryConfig::backoff(BackoffStrategy::default(), true))
///     .build()?;
///
/// let hits = sdk
///     .search()
///     .search_datasets(&SearchParams::query("environment"), None)
///     .await?;
/// println!("{} hits", hits.data.hits.hits.len());
///
/// let namespaces = sdk
///     .statistics()
///     .list_namespaces(&StatsListParams::new(0, 10), None)
///     .await?;
/// println!("{} namespaces", namespaces.items.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Dateno {
    base: BaseSdk,
}

impl Dateno {
    /// Creates a new `DatenoBuilder` for configuring a client.
    pub fn builder() -> DatenoBuilder {
        DatenoBuilder::new()
    }

    pub fn config(&self) -> &Arc<SdkConfiguration> {
        self.base.config()
    }

    pub fn statistics(&self) -> StatisticsApi {
        StatisticsApi::new(self.base.clone())
    }

    pub fn search(&self) -> SearchApi {
        SearchApi::new(self.base.clone())
    }

    pub fn data_catalogs(&self) -> DataCatalogsApi {
        DataCatalogsApi::new(self.base.clone())
    }

    pub fn raw_data_access(&self) -> RawDataAccessApi {
        RawDataAccessApi::new(self.base.clone())
    }

    pub fn service(&self) -> ServiceApi {
        ServiceApi::new(self.base.clone())
    }
}

/// Builder for configuring and creating a [`Dateno`] client.
///
/// # Examples
///
/// ```no_run
/// use dateno::DatenoBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), dateno::Error> {
/// let sdk = DatenoBuilder::new()
///     .server_url("http://127.0.0.1:8100")
///     .api_key_header("my-key")
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct DatenoBuilder {
    client: Option<reqwest::Client>,
    server_url: Option<String>,
    server_idx: Option<usize>,
    timeout: Option<Duration>,
    security: Security,
    retry_config: Option<RetryConfig>,
    hooks: Hooks,
    user_agent: Option<String>,
}

impl DatenoBuilder {
    /// Creates a new `DatenoBuilder` with the default hooks installed.
    pub fn new() -> Self {
        Self {
            client: None,
            server_url: None,
            server_idx: None,
            timeout: None,
            security: Security::default(),
            retry_config: None,
            hooks: Hooks::with_defaults(),
            user_agent: None,
        }
    }

    /// A builder seeded from `DATENO_SERVER_URL` and `DATENO_APIKEY`.
    ///
    /// Unset or empty variables are ignored.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        let mut builder = Self::new();
        if let Some(url) = var(ENV_SERVER_URL) {
            builder = builder.server_url(url);
        }
        if let Some(key) = var(ENV_API_KEY) {
            builder = builder.api_key_query(key);
        }
        builder
    }

    /// Uses `client` as the transport. The SDK never tears it down.
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Overrides the server list with an explicit base URL.
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Selects an entry of [`SERVERS`](crate::config::SERVERS).
    pub fn server_idx(mut self, idx: usize) -> Self {
        self.server_idx = Some(idx);
        self
    }

    /// Sets the default per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn security(mut self, security: Security) -> Self {
        self.security = security;
        self
    }

    pub fn api_key_query(mut self, key: impl Into<String>) -> Self {
        self.security.api_key_query = Some(key.into());
        self
    }

    pub fn api_key_header(mut self, key: impl Into<String>) -> Self {
        self.security.api_key_header = Some(key.into());
        self
    }

    pub fn bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.security.bearer_auth = Some(token.into());
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.security.basic_auth = Some((username.into(), password.into()));
        self
    }

    /// Sets the default retry policy; calls run once when unset.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = Some(config);
        self
    }

    /// Registers a hook after the ones already installed.
    pub fn hook(mut self, hook: impl Hook + 'static) -> Self {
        self.hooks.register(hook);
        self
    }

    /// Replaces the whole hook registry, defaults included.
    pub fn hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the configured client.
    ///
    /// # Errors
    ///
    /// Returns an error if the server selection does not resolve to a base URL
    /// or if the HTTP client cannot be created.
    pub fn build(self) -> Result<Dateno> {
        let client_supplied = self.client.is_some();
        let client = match self.client {
            Some(client) => client,
            None => reqwest::Client::builder().build().map_err(|e| {
                Error::Configuration(format!("Failed to build HTTP client: {}", e))
            })?,
        };

        let server_url = self.server_url.filter(|u| !u.is_empty());
        let server_idx = match server_url {
            Some(_) => self.server_idx,
            None => Some(self.server_idx.unwrap_or(0)),
        };

        let config = SdkConfiguration {
            client,
            client_supplied,
            server_url,
            server_idx,
            timeout: self.timeout,
            security: (!self.security.is_empty()).then_some(self.security),
            retry_config: self.retry_config,
            hooks: self.hooks,
            user_agent: self
                .user_agent
                .unwrap_or_else(|| format!("dateno-sdk-rust/{}", SDK_VERSION)),
            sdk_version: SDK_VERSION.to_string(),
        };

        let server = config.get_server_details()?;
        tracing::debug!(
            server = %server,
            client_supplied = client_supplied,
            hooks = config.hooks.len(),
            "Dateno client configured"
        );

        Ok(Dateno {
            base: BaseSdk::new(Arc::new(config)),
        })
    }

    /// Builds a [`blocking::Dateno`](crate::blocking::Dateno).
    ///
    /// # Errors
    ///
    /// Fails like [`build`](Self::build), or if the runtime cannot be created.
    pub fn build_blocking(self) -> Result<crate::blocking::Dateno> {
        crate::blocking::Dateno::new(self.build()?)
    }
}

impl Default for DatenoBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SERVERS;

    #[test]
    fn defaults_resolve_first_server() {
        let sdk = Dateno::builder().build().unwrap();
        let config = sdk.config();

        assert_eq!(config.server_idx, Some(0));
        assert_eq!(config.get_server_details().unwrap(), SERVERS[0]);
        assert!(!config.client_supplied);
        assert!(config.security.is_none());
        assert_eq!(config.hooks.len(), 1);
        assert!(config.user_agent.starts_with("dateno-sdk-rust/"));
    }

    #[test]
    fn invalid_server_index_fails_build() {
        let err = Dateno::builder().server_idx(7).build().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn supplied_client_is_flagged() {
        let sdk = Dateno::builder()
            .client(reqwest::Client::new())
            .server_url("https://example.invalid/")
            .build()
            .unwrap();

        assert!(sdk.config().client_supplied);
        assert_eq!(
            sdk.config().get_server_details().unwrap(),
            "https://example.invalid"
        );
    }

    #[test]
    fn security_shortcuts_combine() {
        let sdk = Dateno::builder()
            .api_key_query("q")
            .bearer_auth("t")
            .build()
            .unwrap();

        let security = sdk.config().security.clone().unwrap();
        assert_eq!(security.api_key_query.as_deref(), Some("q"));
        assert_eq!(security.bearer_auth.as_deref(), Some("t"));
        assert!(security.api_key_header.is_none());
    }

    #[test]
    fn basic_auth_shortcut_sets_credentials() {
        let sdk = Dateno::builder()
            .basic_auth("user", "pass")
            .build()
            .unwrap();

        let security = sdk.config().security.clone().unwrap();
        assert_eq!(
            security.basic_auth,
            Some(("user".to_string(), "pass".to_string()))
        );
        assert!(security.bearer_auth.is_none());
    }
}
