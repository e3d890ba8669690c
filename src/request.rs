//! Request descriptors and request construction.
//!
//! A [`RequestDescriptor`] captures everything an operation declares about a
//! call. [`build_request`] turns it into a [`reqwest::Request`] by merging
//! parameters from the descriptor, the security scheme and the per-call
//! overlay. Nothing here performs I/O.

use crate::{
    retry::RetryConfig,
    security::{get_security, Security},
    Error, Result,
};
use http::{
    header::{ACCEPT, CONTENT_TYPE, USER_AGENT},
    HeaderMap, HeaderName, HeaderValue, Method,
};
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// A serialized request body together with its media type.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBody {
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl RequestBody {
    /// Serializes `value` as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let bytes =
            serde_json::to_vec(value).map_err(|e| Error::SerializationFailed(e.to_string()))?;
        Ok(Self {
            content_type: "application/json",
            bytes,
        })
    }
}

/// Everything an operation declares about a single HTTP call.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// The HTTP method (GET, POST, etc.).
    pub method: Method,

    /// Path template relative to the base URL, e.g. `/statsdb/0.1/ns/{ns_id}`.
    pub path: String,

    /// Values substituted into the path template.
    pub path_params: Vec<(String, String)>,

    /// Query parameters, in order.
    pub query_params: Vec<(String, String)>,

    /// Operation-level headers.
    pub headers: HeaderMap,

    /// Serialized body, if any.
    pub body: Option<RequestBody>,

    /// Whether building must fail when `body` is `None`.
    pub body_required: bool,

    /// Value of the `Accept` header.
    pub accept: String,

    /// Per-attempt timeout.
    pub timeout: Option<Duration>,

    /// Full URL that replaces base URL + path.
    pub url_override: Option<String>,

    /// Caller headers applied last; they win every conflict.
    pub header_overlay: HeaderMap,
}

impl RequestDescriptor {
    /// Creates a descriptor for `method` and the path template `path`.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            path_params: Vec::new(),
            query_params: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            body_required: false,
            accept: "application/json".to_string(),
            timeout: None,
            url_override: None,
            header_overlay: HeaderMap::new(),
        }
    }

    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push((name.into(), value.into()));
        self
    }

    /// Adds a query parameter to the request.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((key.into(), value.into()));
        self
    }

    /// Appends the fields of a serde query struct.
    ///
    /// # Errors
    ///
    /// Returns an error if `params` does not serialize to a flat key/value form.
    pub fn with_query<T: Serialize>(mut self, params: &T) -> Result<Self> {
        self.query_params.extend(get_query_params(params)?);
        Ok(self)
    }

    /// Adds a header to the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn with_body(mut self, body: Option<RequestBody>) -> Self {
        self.body = body;
        self
    }

    pub fn body_required(mut self, required: bool) -> Self {
        self.body_required = required;
        self
    }

    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url_override(mut self, url: Option<String>) -> Self {
        self.url_override = url;
        self
    }

    pub fn header_overlay(mut self, headers: HeaderMap) -> Self {
        self.header_overlay = headers;
        self
    }
}

impl Default for RequestDescriptor {
    fn default() -> Self {
        Self::new(Method::GET, "")
    }
}

/// Per-call overrides accepted by every resource method.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Per-attempt timeout; falls back to the configured default.
    pub timeout: Option<Duration>,
    /// Retry policy for this call; falls back to the configured default.
    pub retries: Option<RetryConfig>,
    /// Base URL for this call instead of the configured server.
    pub server_url: Option<String>,
    /// Extra headers, applied last.
    pub headers: HeaderMap,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn retries(mut self, retries: RetryConfig) -> Self {
        self.retries = Some(retries);
        self
    }

    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Adds a header to the per-call overlay.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
        self.headers.insert(name, value);
        Ok(self)
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let name = HeaderName::try_from(name)
        .map_err(|e| Error::Configuration(format!("Invalid header name: {}", e)))?;
    let value = HeaderValue::try_from(value)
        .map_err(|e| Error::Configuration(format!("Invalid header value: {}", e)))?;
    Ok((name, value))
}

/// Substitutes `{name}` placeholders in `path` and appends it to `base_url`.
///
/// The join is literal: no separator is inserted or removed, so callers must
/// pass paths with a leading `/`.
///
/// ```
/// use dateno::request::generate_url;
///
/// let url = generate_url("https://h", "/ns/{ns_id}", &[("ns_id", "wb")]);
/// assert_eq!(url, "https://h/ns/wb");
/// assert_eq!(generate_url("https://h/", "p", &[] as &[(&str, &str)]), "https://h/p");
/// ```
pub fn generate_url<K, V>(base_url: &str, path: &str, path_params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut path = path.to_string();
    for (name, value) in path_params {
        let placeholder = format!("{{{}}}", name.as_ref());
        path = path.replace(&placeholder, &encode_path_segment(value.as_ref()));
    }
    format!("{}{}", base_url, path)
}

fn encode_path_segment(value: &str) -> String {
    // form encoding only emits '+' for a space; a literal '+' becomes %2B
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Flattens a serde query struct into ordered `(name, value)` pairs.
///
/// Field renames and `skip_serializing_if` attributes on `params` control the
/// wire names and which fields are sent.
pub fn get_query_params<T: Serialize>(params: &T) -> Result<Vec<(String, String)>> {
    let encoded =
        serde_urlencoded::to_string(params).map_err(|e| Error::SerializationFailed(e.to_string()))?;
    Ok(url::form_urlencoded::parse(encoded.as_bytes())
        .into_owned()
        .collect())
}

/// Merges `overlay` into `base`; overlay values replace base values with the same key.
pub(crate) fn merge_pairs(
    mut base: Vec<(String, String)>,
    overlay: Vec<(String, String)>,
) -> Vec<(String, String)> {
    for (key, value) in overlay {
        base.retain(|(k, _)| *k != key);
        base.push((key, value));
    }
    base
}

fn overlay_headers(target: &mut HeaderMap, overlay: &HeaderMap) {
    for (name, value) in overlay {
        target.insert(name.clone(), value.clone());
    }
}

/// Builds the outbound request for `descriptor`.
///
/// Query parameters are the descriptor's merged with the security scheme's.
/// Headers are layered as descriptor, security, `Accept`/`User-Agent`, then
/// the descriptor's overlay; later layers replace earlier ones.
///
/// # Errors
///
/// Returns [`Error::RequestBodyRequired`] if the descriptor requires a body and
/// has none, [`Error::InvalidUrl`] if the resolved URL does not parse, and
/// [`Error::Configuration`] for invalid header values.
pub fn build_request(
    client: &reqwest::Client,
    base_url: &str,
    descriptor: &RequestDescriptor,
    security: Option<&Security>,
    user_agent: &str,
) -> Result<reqwest::Request> {
    let url = match &descriptor.url_override {
        Some(url) => url.clone(),
        None => generate_url(base_url, &descriptor.path, &descriptor.path_params),
    };
    let url = Url::parse(&url)?;

    let (security_headers, security_query) = match security {
        Some(security) => get_security(security)?,
        None => (HeaderMap::new(), Vec::new()),
    };

    let query = merge_pairs(descriptor.query_params.clone(), security_query);

    let mut headers = descriptor.headers.clone();
    overlay_headers(&mut headers, &security_headers);
    headers.insert(
        ACCEPT,
        HeaderValue::try_from(descriptor.accept.as_str())
            .map_err(|e| Error::Configuration(format!("Invalid accept value: {}", e)))?,
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::try_from(user_agent)
            .map_err(|e| Error::Configuration(format!("Invalid user agent: {}", e)))?,
    );

    if let Some(body) = &descriptor.body {
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(body.content_type));
        }
    }

    overlay_headers(&mut headers, &descriptor.header_overlay);

    if descriptor.body_required && descriptor.body.is_none() {
        return Err(Error::RequestBodyRequired);
    }

    let mut builder = client
        .request(descriptor.method.clone(), url)
        .headers(headers);

    if !query.is_empty() {
        builder = builder.query(&query);
    }

    if let Some(timeout) = descriptor.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(body) = &descriptor.body {
        builder = builder.body(body.bytes.clone());
    }

    builder
        .build()
        .map_err(|e| Error::Configuration(format!("Failed to build request: {}", e)))
}
