//! Error types for Dateno API calls.
//!
//! Every failure surfaces to the caller as an [`Error`]. Variants that come from
//! an HTTP response keep the status code and the raw body so that a failed call
//! can be diagnosed without re-issuing it.

use crate::models::{ErrorResponseData, HttpValidationErrorData};
use http::{HeaderMap, StatusCode};

/// The main error type for the SDK.
///
/// # Examples
///
/// ```no_run
/// use dateno::{Dateno, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let sdk = Dateno::builder().api_key_query("secret").build()?;
///
/// match sdk.statistics().get_namespace("wb", None).await {
///     Ok(ns) => println!("namespace: {:?}", ns.data.name),
///     Err(Error::Api { status, data, .. }) => {
///         eprintln!("API error {}: {:?}", status, data.detail);
///     }
///     Err(Error::Validation { data, .. }) => {
///         eprintln!("invalid request: {:?}", data.detail);
///     }
///     Err(e) => eprintln!("other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A network-level error occurred before a response was obtained.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request exceeded its per-attempt timeout.
    #[error("Request timed out")]
    Timeout,

    /// Neither the transport nor the error hooks produced a response.
    #[error("{0}")]
    NoResponse(String),

    /// A response that matched no declared branch, or an error status that the
    /// hooks did not resolve.
    ///
    /// The body is a preview capped at [`crate::BODY_PREVIEW_LIMIT`] bytes.
    #[error("{message}: Status {} Content-Type {content_type}. Body: {body}", .status.as_u16())]
    Default {
        /// Human readable summary
        message: String,
        /// The HTTP status code
        status: StatusCode,
        /// The `Content-Type` header, empty when absent
        content_type: String,
        /// Decoded body preview
        body: String,
        /// The response headers
        headers: HeaderMap,
    },

    /// The API returned a declared error payload (4xx/5xx JSON).
    #[error("{raw_response}")]
    Api {
        /// The HTTP status code
        status: StatusCode,
        /// Parsed error payload
        data: ErrorResponseData,
        /// The raw response body
        raw_response: String,
        /// The response headers
        headers: HeaderMap,
    },

    /// The API rejected the request parameters (422).
    #[error("{raw_response}")]
    Validation {
        /// The HTTP status code
        status: StatusCode,
        /// Parsed validation payload
        data: HttpValidationErrorData,
        /// The raw response body
        raw_response: String,
        /// The response headers
        headers: HeaderMap,
    },

    /// A successful response body did not fit the expected model.
    #[error("{message}: {source}")]
    ResponseValidation {
        /// Human readable summary
        message: String,
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
        /// The underlying serde failure
        #[source]
        source: serde_json::Error,
    },

    /// A response whose status is in the retryable set.
    ///
    /// Only seen by code that drives [`crate::retry::retry_async`] directly; the
    /// SDK converts it back into a response once retries stop.
    #[error("Retryable status {status} received")]
    RetryableStatus {
        /// The HTTP status code
        status: StatusCode,
        /// The response that triggered the retry
        response: Box<reqwest::Response>,
    },

    /// The operation declares a required body and none was supplied.
    #[error("request body is required")]
    RequestBodyRequired,

    /// Invalid configuration was provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failed to serialize request parameters or body.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A lifecycle hook failed.
    #[error("Hook failed: {0}")]
    Hook(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Local I/O failed (export helpers).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wraps a transport failure, folding timeouts into [`Error::Timeout`].
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::Network(err)
        }
    }

    /// Wraps an arbitrary hook failure.
    pub fn hook(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Hook(err.into())
    }

    /// Returns `true` for failures that happened before any response was obtained.
    ///
    /// ```
    /// use dateno::Error;
    ///
    /// assert!(Error::Timeout.is_connection_error());
    /// assert!(!Error::RequestBodyRequired.is_connection_error());
    /// ```
    pub fn is_connection_error(&self) -> bool {
        match self {
            Error::Timeout => true,
            Error::Network(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }

    /// Returns the HTTP status code if this error carries one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Default { status, .. }
            | Error::Api { status, .. }
            | Error::Validation { status, .. }
            | Error::ResponseValidation { status, .. }
            | Error::RetryableStatus { status, .. } => Some(*status),
            Error::Network(e) => e.status(),
            _ => None,
        }
    }

    /// Returns the `Content-Type` of the response behind this error, if known.
    pub fn content_type(&self) -> Option<&str> {
        match self {
            Error::Default { content_type, .. } => Some(content_type.as_str()),
            Error::Api { headers, .. } | Error::Validation { headers, .. } => {
                crate::matcher::content_type(headers)
            }
            _ => None,
        }
    }

    /// Returns the raw (or previewed) response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Default { body, .. } => Some(body.as_str()),
            Error::Api { raw_response, .. }
            | Error::Validation { raw_response, .. }
            | Error::ResponseValidation { raw_response, .. } => Some(raw_response.as_str()),
            _ => None,
        }
    }
}

/// A specialized `Result` type for Dateno API calls.
pub type Result<T> = std::result::Result<T, Error>;
