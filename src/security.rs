//! Security schemes and their request contributions.

use crate::{Error, Result};
use base64::{engine::general_purpose, Engine as _};
use http::{header::AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use std::fmt;

/// Query parameter carrying the API key.
pub const API_KEY_QUERY_PARAM: &str = "apikey";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Credentials attached to every request.
///
/// Any combination of schemes may be set; each contributes independently.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Security {
    pub api_key_query: Option<String>,
    pub api_key_header: Option<String>,
    pub bearer_auth: Option<String>,
    /// Username and password sent as `Authorization: Basic`.
    pub basic_auth: Option<(String, String)>,
}

impl Security {
    pub fn api_key_query(key: impl Into<String>) -> Self {
        Self {
            api_key_query: Some(key.into()),
            ..Default::default()
        }
    }

    pub fn api_key_header(key: impl Into<String>) -> Self {
        Self {
            api_key_header: Some(key.into()),
            ..Default::default()
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            bearer_auth: Some(token.into()),
            ..Default::default()
        }
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            basic_auth: Some((username.into(), password.into())),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.api_key_query.is_none()
            && self.api_key_header.is_none()
            && self.bearer_auth.is_none()
            && self.basic_auth.is_none()
    }
}

impl fmt::Debug for Security {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        let user = self.basic_auth.as_ref().map(|(user, _)| user);
        f.debug_struct("Security")
            .field("api_key_query", &redact(&self.api_key_query))
            .field("api_key_header", &redact(&self.api_key_header))
            .field("bearer_auth", &redact(&self.bearer_auth))
            .field("basic_auth", &user.map(|u| (u, "<redacted>")))
            .finish()
    }
}

/// Converts a security descriptor into header and query contributions.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if a credential is not a valid header value.
pub fn get_security(security: &Security) -> Result<(HeaderMap, Vec<(String, String)>)> {
    let mut headers = HeaderMap::new();
    let mut query = Vec::new();

    if let Some(key) = &security.api_key_query {
        query.push((API_KEY_QUERY_PARAM.to_string(), key.clone()));
    }

    if let Some(key) = &security.api_key_header {
        headers.insert(HeaderName::from_static("x-api-key"), sensitive_value(key)?);
    }

    // Bearer is applied last and wins when both schemes are set.
    if let Some((username, password)) = &security.basic_auth {
        let encoded = general_purpose::STANDARD.encode(format!("{}:{}", username, password));
        headers.insert(
            AUTHORIZATION,
            sensitive_value(&format!("Basic {}", encoded))?,
        );
    }

    if let Some(token) = &security.bearer_auth {
        let value = if token.to_ascii_lowercase().starts_with("bearer ") {
            token.clone()
        } else {
            format!("Bearer {}", token)
        };
        headers.insert(AUTHORIZATION, sensitive_value(&value)?);
    }

    Ok((headers, query))
}

fn sensitive_value(value: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::try_from(value)
        .map_err(|e| Error::Configuration(format!("Invalid credential value: {}", e)))?;
    value.set_sensitive(true);
    Ok(value)
}
