//! Wire models for the Dateno API.
//!
//! Models keep the fields the SDK relies on as typed members and capture
//! everything else in a flattened `extra` map so that new server fields never
//! break deserialization.

mod catalogs;
mod errors;
mod search;
mod service;
mod statistics;

pub use catalogs::{DataCatalog, DataCatalogSearchResponse, ListCatalogsParams};
pub use errors::{ErrorResponseData, HttpValidationErrorData, ValidationError};
pub use search::{
    FacetValuesParams, Hit, SearchDslParams, SearchHits, SearchIndexEntry, SearchParams,
    SearchResponse, SimilarParams, TotalHits,
};
pub use service::HealthStatus;
pub use statistics::{
    ExportAccept, Indicator, IndicatorMetadata, MetadataField, Namespace, StatsListParams,
    StatsPage, Table, Timeseries,
};

/// Extra, untyped fields of a model.
pub type Extra = serde_json::Map<String, serde_json::Value>;
