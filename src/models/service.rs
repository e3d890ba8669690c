use super::Extra;
use serde::{Deserialize, Serialize};

/// Response of `GET /healthz`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `"ok"` or `"degraded"`.
    pub status: String,

    /// Whether the search backend is reachable.
    #[serde(default)]
    pub elasticsearch: Option<bool>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
