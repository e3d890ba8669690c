use super::Extra;
use crate::pagination::Page;
use serde::{Deserialize, Serialize};

/// Query parameters of `GET /registry/search/catalogs/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListCatalogsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

/// A data catalog registry record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataCatalog {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Response of the catalog search: `{ meta, data }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataCatalogSearchResponse {
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
    #[serde(default = "Vec::new")]
    pub data: Vec<DataCatalog>,
}

impl Page for DataCatalogSearchResponse {
    type Item = DataCatalog;

    fn items(&self) -> &[DataCatalog] {
        &self.data
    }

    fn into_items(self) -> Vec<DataCatalog> {
        self.data
    }
}
