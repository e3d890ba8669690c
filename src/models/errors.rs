use super::Extra;
use serde::{Deserialize, Serialize};

/// Error payload returned by the API for 4xx/5xx responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponseData {
    /// Free-form detail, usually a string.
    #[serde(default)]
    pub detail: Option<serde_json::Value>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// Payload of a 422 response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpValidationErrorData {
    #[serde(default)]
    pub detail: Vec<ValidationError>,
}

/// A single rejected parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Location of the offending value, e.g. `["query", "limit"]`.
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}
