use super::Extra;
use crate::pagination::Page;
use serde::{Deserialize, Serialize};

/// Query parameters of the start/limit statistics listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl StatsListParams {
    pub fn new(start: u64, limit: u64) -> Self {
        Self {
            start: Some(start),
            limit: Some(limit),
        }
    }
}

/// One page of a statistics listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsPage<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,

    /// Server-reported totals. Informational only; pagination ignores it.
    #[serde(default)]
    pub totals: Option<serde_json::Value>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl<T> Page for StatsPage<T> {
    type Item = T;

    fn items(&self) -> &[T] {
        &self.items
    }

    fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// A statistics namespace, e.g. `wb` or `ilostat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A table inside a namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A metadata key/value attached to an indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataField {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Indicator metadata: usually a list of key/value fields, sometimes a plain object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndicatorMetadata {
    Fields(Vec<MetadataField>),
    Object(Extra),
}

impl IndicatorMetadata {
    /// The key/value fields; empty for object-shaped metadata.
    pub fn fields(&self) -> &[MetadataField] {
        match self {
            IndicatorMetadata::Fields(fields) => fields,
            IndicatorMetadata::Object(_) => &[],
        }
    }

    /// Looks up a value by key in either shape.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        match self {
            IndicatorMetadata::Fields(fields) => fields
                .iter()
                .find(|f| f.key.as_deref() == Some(key))
                .and_then(|f| f.value.as_ref()),
            IndicatorMetadata::Object(map) => map.get(key),
        }
    }
}

/// An indicator inside a namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub id: String,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Absent on some listings; treat `None` like an empty list.
    #[serde(default)]
    pub metadata: Option<IndicatorMetadata>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A single time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeseries {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// `Accept` values understood by the time series export endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportAccept {
    Csv,
    Json,
    Parquet,
    OctetStream,
}

impl ExportAccept {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportAccept::Csv => "text/csv",
            ExportAccept::Json => "application/json",
            ExportAccept::Parquet => "application/vnd.apache.parquet",
            ExportAccept::OctetStream => "application/octet-stream",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_page_tolerates_missing_metadata_and_keeps_unknown_fields() {
        let raw = r#"{
            "items": [{"id": "CLD_TPOP", "table": "T1", "name": "Population", "unit": "persons"}],
            "totals": {"total": 1}
        }"#;

        let page: StatsPage<Indicator> = serde_json::from_str(raw).unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(page.items[0].metadata.is_none());
        assert_eq!(page.items[0].extra["unit"], "persons");
        assert!(page.totals.is_some());
    }

    #[test]
    fn indicator_accepts_list_metadata() {
        let raw = r#"{"id": "X", "metadata": [{"key": "unit", "value": "persons"}]}"#;

        let indicator: Indicator = serde_json::from_str(raw).unwrap();
        let metadata = indicator.metadata.unwrap();
        assert_eq!(metadata.fields().len(), 1);
        assert_eq!(metadata.get("unit").unwrap(), "persons");
    }

    #[test]
    fn indicator_accepts_object_metadata() {
        let raw = r#"{"id": "X", "table": "X", "name": "X", "metadata": {"foo": "bar"}}"#;

        let indicator: Indicator = serde_json::from_str(raw).unwrap();
        let metadata = indicator.metadata.unwrap();
        assert!(matches!(metadata, IndicatorMetadata::Object(_)));
        assert!(metadata.fields().is_empty());
        assert_eq!(metadata.get("foo").unwrap(), "bar");
    }

    #[test]
    fn list_params_skip_unset_fields() {
        let q = serde_urlencoded::to_string(StatsListParams {
            start: None,
            limit: Some(10),
        })
        .unwrap();
        assert_eq!(q, "limit=10");
    }
}
