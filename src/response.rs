//! Response wrapper that preserves both parsed data and raw response details.
//!
//! The [`Response`] type wraps the deserialized response data along with metadata
//! about the HTTP exchange, making it easy to access timing information, headers,
//! and the raw response body for debugging and observability.

use crate::{Error, Result};
use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// Maximum number of body bytes read into an error for a response that matched
/// no declared branch.
pub const BODY_PREVIEW_LIMIT: usize = 10_000;

/// A successful API response.
///
/// # Type Parameters
///
/// * `T` - The type of the deserialized response data
///
/// # Examples
///
/// ```no_run
/// use dateno::Dateno;
///
/// # async fn example() -> Result<(), dateno::Error> {
/// let sdk = Dateno::builder().build()?;
///
/// let health = sdk.service().get_healthz(None).await?;
///
/// println!("Status: {}", health.data.status);
/// println!("Request took {:?}", health.latency);
///
/// // Access raw response for debugging
/// if health.latency > std::time::Duration::from_secs(1) {
///     println!("Slow response body: {}", health.raw_body);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The deserialized response data.
    pub data: T,

    /// The raw response body as a string.
    pub raw_body: String,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from the first attempt until the accepted response, retries included.
    pub latency: Duration,
}

impl<T> Response<T> {
    pub fn new(
        data: T,
        raw_body: String,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
    ) -> Self {
        Self {
            data,
            raw_body,
            status,
            headers,
            latency,
        }
    }

    /// Maps the response data to a different type, keeping the metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dateno::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response::new(
    ///     42,
    ///     "42".to_string(),
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     Duration::from_millis(100),
    /// );
    ///
    /// let string_response = response.map(|n| n.to_string());
    /// assert_eq!(string_response.data, "42");
    /// ```
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            raw_body: self.raw_body,
            status: self.status,
            headers: self.headers,
            latency: self.latency,
        }
    }

    /// Returns the payload, dropping the metadata.
    pub fn into_data(self) -> T {
        self.data
    }

    /// Returns a reference to a header value by name.
    ///
    /// ```
    /// # use dateno::Response;
    /// # use http::{HeaderMap, StatusCode, HeaderValue};
    /// # use std::time::Duration;
    /// let mut headers = HeaderMap::new();
    /// headers.insert("content-type", HeaderValue::from_static("application/json"));
    ///
    /// let response = Response::new((), String::new(), StatusCode::OK, headers, Duration::ZERO);
    ///
    /// assert_eq!(response.header("content-type").unwrap(), "application/json");
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

impl<T> AsRef<T> for Response<T> {
    fn as_ref(&self) -> &T {
        &self.data
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

/// Reads at most `limit` bytes of `response`'s body and decodes them lossily.
///
/// The rest of the body is never pulled off the connection, so a huge or
/// endless stream costs no more than `limit` bytes of memory.
pub async fn read_body_preview(mut response: reqwest::Response, limit: usize) -> Result<String> {
    let mut buf: Vec<u8> = Vec::with_capacity(limit.min(8 * 1024));

    while buf.len() < limit {
        match response.chunk().await.map_err(Error::from_transport)? {
            Some(chunk) => {
                let take = (limit - buf.len()).min(chunk.len());
                buf.extend_from_slice(&chunk[..take]);
            }
            None => break,
        }
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(body: &'static str) -> reqwest::Response {
        reqwest::Response::from(
            http::Response::builder()
                .status(StatusCode::BAD_GATEWAY)
                .body(body)
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn preview_is_truncated_to_limit() {
        let preview = read_body_preview(response("abcdefghij"), 4).await.unwrap();
        assert_eq!(preview, "abcd");
    }

    #[tokio::test]
    async fn preview_of_short_body_is_whole_body() {
        let preview = read_body_preview(response("boom"), BODY_PREVIEW_LIMIT)
            .await
            .unwrap();
        assert_eq!(preview, "boom");
    }

    #[test]
    fn deref_reaches_data() {
        let r = Response::new(
            vec![1, 2, 3],
            "[1,2,3]".to_string(),
            StatusCode::OK,
            HeaderMap::new(),
            Duration::ZERO,
        );
        assert_eq!(r.len(), 3);
        assert_eq!(r.into_data(), vec![1, 2, 3]);
    }
}
