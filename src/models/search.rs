use super::Extra;
use crate::pagination::Page;
use serde::{Deserialize, Serialize};

/// Query parameters of `GET /search/0.2/query`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
}

impl SearchParams {
    pub fn query(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Default::default()
        }
    }
}

/// Query parameters of `POST /search/0.2/es_search`. The DSL itself is the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchDslParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sortby: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetValuesParams {
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimilarParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

/// Search response in Elasticsearch shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: SearchHits,
    #[serde(default)]
    pub facets: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHits {
    #[serde(default)]
    pub total: Option<TotalHits>,
    #[serde(default = "Vec::new")]
    pub hits: Vec<Hit>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalHits {
    pub value: u64,
    #[serde(default)]
    pub relation: Option<String>,
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, alias = "_score")]
    pub score: Option<f64>,
    #[serde(default, alias = "_source")]
    pub source: Option<serde_json::Value>,
}

impl Page for SearchResponse {
    type Item = Hit;

    fn items(&self) -> &[Hit] {
        &self.hits.hits
    }

    fn into_items(self) -> Vec<Hit> {
        self.hits.hits
    }
}

/// A dataset record from the search index, returned verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchIndexEntry {
    #[serde(flatten)]
    pub fields: Extra,
}

impl SearchIndexEntry {
    pub fn id(&self) -> Option<&str> {
        self.fields
            .get("id")
            .or_else(|| self.fields.get("_id"))
            .and_then(|v| v.as_str())
    }
}
