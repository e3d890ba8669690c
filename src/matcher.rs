//! Status-code and content-type matching.
//!
//! Operations declare the responses they expect as status patterns: either an
//! exact three digit code (`"200"`) or a class (`"4XX"`, any code whose first
//! digit is 4). These helpers decide which declared branch a response falls in.

use http::{header::CONTENT_TYPE, HeaderMap, StatusCode};

/// One status pattern or a list of them.
#[derive(Debug, Clone, Copy)]
pub enum ExpectedStatus<'a> {
    One(&'a str),
    Any(&'a [&'a str]),
}

impl<'a> From<&'a str> for ExpectedStatus<'a> {
    fn from(pattern: &'a str) -> Self {
        ExpectedStatus::One(pattern)
    }
}

impl<'a> From<&'a [&'a str]> for ExpectedStatus<'a> {
    fn from(patterns: &'a [&'a str]) -> Self {
        ExpectedStatus::Any(patterns)
    }
}

impl<'a, const N: usize> From<&'a [&'a str; N]> for ExpectedStatus<'a> {
    fn from(patterns: &'a [&'a str; N]) -> Self {
        ExpectedStatus::Any(patterns.as_slice())
    }
}

impl ExpectedStatus<'_> {
    pub fn matches(&self, status: u16) -> bool {
        match self {
            ExpectedStatus::One(p) => match_status_code(p, status),
            ExpectedStatus::Any(ps) => match_status_codes(ps, status),
        }
    }
}

fn match_status_code(pattern: &str, status: u16) -> bool {
    let code = status.to_string();
    let pattern = pattern.trim();

    if pattern.len() == 3 && pattern.is_ascii() && pattern[1..].eq_ignore_ascii_case("xx") {
        return code.len() == 3 && code.as_bytes()[0] == pattern.as_bytes()[0];
    }

    pattern == code
}

/// Returns `true` if any pattern matches `status`.
///
/// ```
/// use dateno::matcher::match_status_codes;
///
/// assert!(match_status_codes(&["4XX"], 404));
/// assert!(!match_status_codes(&["4XX"], 500));
/// assert!(match_status_codes(&["404", "5XX"], 500));
/// ```
pub fn match_status_codes(patterns: &[&str], status: u16) -> bool {
    patterns.iter().any(|p| match_status_code(p, status))
}

/// Case-insensitive prefix match of a `Content-Type` value against `expected`.
///
/// `"*"` matches anything, including a missing header. Parameters such as
/// `charset` are ignored.
pub fn match_content_type(actual: Option<&str>, expected: &str) -> bool {
    if expected == "*" {
        return true;
    }

    let Some(actual) = actual else {
        return false;
    };

    let media_type = actual.split(';').next().unwrap_or_default().trim();
    media_type
        .to_ascii_lowercase()
        .starts_with(&expected.to_ascii_lowercase())
}

/// Reads the `Content-Type` header as a string, if present and valid.
pub fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
}

/// Applies both the status and the content-type expectation.
pub fn match_response<'a>(
    status: StatusCode,
    headers: &HeaderMap,
    expected: impl Into<ExpectedStatus<'a>>,
    expected_content_type: &str,
) -> bool {
    expected.into().matches(status.as_u16())
        && match_content_type(content_type(headers), expected_content_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_exact_and_class_patterns() {
        assert!(match_status_codes(&["200"], 200));
        assert!(!match_status_codes(&["201"], 200));
        assert!(match_status_codes(&["4XX"], 404));
        assert!(!match_status_codes(&["4XX"], 500));
        assert!(match_status_codes(&["5XX"], 503));
        assert!(!match_status_codes(&["5XX"], 200));
        assert!(match_status_codes(&["404", "5XX"], 500));
        assert!(match_status_codes(&["404", "5XX"], 404));
        assert!(!match_status_codes(&["404", "5XX"], 200));
        assert!(match_status_codes(&["5xx"], 502));
        assert!(!match_status_codes(&[], 200));
    }

    #[test]
    fn test_content_type_matching() {
        assert!(match_content_type(
            Some("application/json; charset=utf-8"),
            "application/json"
        ));
        assert!(match_content_type(Some("Application/JSON"), "application/json"));
        assert!(!match_content_type(Some("text/plain"), "application/json"));
        assert!(match_content_type(None, "*"));
        assert!(!match_content_type(None, "application/json"));
    }

    #[test]
    fn test_match_response_single_or_list() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );

        assert!(match_response(StatusCode::OK, &headers, "200", "application/json"));
        assert!(!match_response(StatusCode::OK, &headers, "4XX", "application/json"));
        assert!(match_response(StatusCode::OK, &headers, "200", "*"));
        assert!(match_response(
            StatusCode::NOT_FOUND,
            &headers,
            &["422", "4XX"],
            "application/json"
        ));
    }

    #[test]
    fn test_matching_is_pure() {
        let first = match_status_codes(&["404", "5XX"], 503);
        for _ in 0..3 {
            assert_eq!(match_status_codes(&["404", "5XX"], 503), first);
        }
    }
}
