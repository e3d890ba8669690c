//! Blocking facade over the async client.
//!
//! [`Dateno`] owns a current-thread tokio runtime and drives the async
//! resource methods to completion on it, so both facades share every step of
//! request handling. Paginated listings come back as plain [`Iterator`]s.
//!
//! Do not call into this module from inside an async runtime; `block_on` panics
//! there.
//!
//! ```no_run
//! use dateno::models::StatsListParams;
//!
//! # fn main() -> Result<(), dateno::Error> {
//! let sdk = dateno::Dateno::builder().api_key_query("my-key").build_blocking()?;
//!
//! for ns in sdk.statistics().paginate_namespaces(0, 50, None) {
//!     println!("{}", ns?.id);
//! }
//! # Ok(())
//! # }
//! ```

use crate::{
    apis,
    models::{
        DataCatalog, DataCatalogSearchResponse, ExportAccept, FacetValuesParams, HealthStatus,
        Hit, Indicator, ListCatalogsParams, Namespace, SearchDslParams, SearchIndexEntry,
        SearchParams, SearchResponse, SimilarParams, StatsListParams, StatsPage, Table,
        Timeseries,
    },
    pagination::{flatten_items, PageIter},
    request::CallOptions,
    Response, Result,
};
use bytes::Bytes;
use serde_json::Value;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Debug, Clone)]
struct Driver {
    rt: Arc<Runtime>,
}

impl Driver {
    fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.rt.block_on(fut)
    }
}

/// Blocking client for the Dateno API.
#[derive(Debug, Clone)]
pub struct Dateno {
    inner: crate::Dateno,
    driver: Driver,
}

impl Dateno {
    /// Wraps an async client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the runtime cannot be created.
    pub fn new(inner: crate::Dateno) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            inner,
            driver: Driver { rt: Arc::new(rt) },
        })
    }

    /// The async client this facade drives.
    pub fn as_async(&self) -> &crate::Dateno {
        &self.inner
    }

    pub fn statistics(&self) -> StatisticsApi {
        StatisticsApi {
            inner: self.inner.statistics(),
            driver: self.driver.clone(),
        }
    }

    pub fn search(&self) -> SearchApi {
        SearchApi {
            inner: self.inner.search(),
            driver: self.driver.clone(),
        }
    }

    pub fn data_catalogs(&self) -> DataCatalogsApi {
        DataCatalogsApi {
            inner: self.inner.data_catalogs(),
            driver: self.driver.clone(),
        }
    }

    pub fn raw_data_access(&self) -> RawDataAccessApi {
        RawDataAccessApi {
            inner: self.inner.raw_data_access(),
            driver: self.driver.clone(),
        }
    }

    pub fn service(&self) -> ServiceApi {
        ServiceApi {
            inner: self.inner.service(),
            driver: self.driver.clone(),
        }
    }
}

/// Blocking [`apis::ServiceApi`].
#[derive(Debug, Clone)]
pub struct ServiceApi {
    inner: apis::ServiceApi,
    driver: Driver,
}

impl ServiceApi {
    pub fn get_healthz(&self, options: Option<CallOptions>) -> Result<Response<HealthStatus>> {
        self.driver.block_on(self.inner.get_healthz(options))
    }
}

/// Blocking [`apis::RawDataAccessApi`].
#[derive(Debug, Clone)]
pub struct RawDataAccessApi {
    inner: apis::RawDataAccessApi,
    driver: Driver,
}

impl RawDataAccessApi {
    pub fn get_raw_entry_by_id(
        &self,
        entry_id: &str,
        apikey: Option<&str>,
        options: Option<CallOptions>,
    ) -> Result<Response<SearchIndexEntry>> {
        self.driver
            .block_on(self.inner.get_raw_entry_by_id(entry_id, apikey, options))
    }
}

/// Blocking [`apis::DataCatalogsApi`].
#[derive(Debug, Clone)]
pub struct DataCatalogsApi {
    inner: apis::DataCatalogsApi,
    driver: Driver,
}

impl DataCatalogsApi {
    pub fn get_catalog_by_id(
        &self,
        catalog_id: &str,
        options: Option<CallOptions>,
    ) -> Result<Response<DataCatalog>> {
        self.driver
            .block_on(self.inner.get_catalog_by_id(catalog_id, options))
    }

    pub fn list_catalogs(
        &self,
        params: &ListCatalogsParams,
        options: Option<CallOptions>,
    ) -> Result<Response<DataCatalogSearchResponse>> {
        self.driver
            .block_on(self.inner.list_catalogs(params, options))
    }

    pub fn iter_catalogs<'a>(
        &'a self,
        q: Option<&'a str>,
        offset: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Iterator<Item = Result<DataCatalogSearchResponse>> + 'a {
        PageIter::new(offset, limit, move |cursor| {
            let params = ListCatalogsParams {
                q: q.map(String::from),
                limit: Some(limit),
                offset: Some(cursor),
            };
            self.list_catalogs(&params, options.clone())
                .map(Response::into_data)
        })
    }

    pub fn paginate_catalogs<'a>(
        &'a self,
        q: Option<&'a str>,
        offset: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Iterator<Item = Result<DataCatalog>> + 'a {
        flatten_items(self.iter_catalogs(q, offset, limit, options))
    }
}

/// Blocking [`apis::SearchApi`].
#[derive(Debug, Clone)]
pub struct SearchApi {
    inner: apis::SearchApi,
    driver: Driver,
}

impl SearchApi {
    pub fn search_datasets(
        &self,
        params: &SearchParams,
        options: Option<CallOptions>,
    ) -> Result<Response<SearchResponse>> {
        self.driver
            .block_on(self.inner.search_datasets(params, options))
    }

    pub fn get_dataset_by_entry_id(
        &self,
        entry_id: &str,
        options: Option<CallOptions>,
    ) -> Result<Response<SearchIndexEntry>> {
        self.driver
            .block_on(self.inner.get_dataset_by_entry_id(entry_id, options))
    }

    pub fn search_datasets_dsl(
        &self,
        params: &SearchDslParams,
        body: Option<&Value>,
        options: Option<CallOptions>,
    ) -> Result<Response<SearchResponse>> {
        self.driver
            .block_on(self.inner.search_datasets_dsl(params, body, options))
    }

    pub fn list_search_facets(&self, options: Option<CallOptions>) -> Result<Response<Value>> {
        self.driver.block_on(self.inner.list_search_facets(options))
    }

    pub fn get_search_facet_values(
        &self,
        params: &FacetValuesParams,
        options: Option<CallOptions>,
    ) -> Result<Response<Value>> {
        self.driver
            .block_on(self.inner.get_search_facet_values(params, options))
    }

    pub fn get_similar_datasets(
        &self,
        entry_id: &str,
        params: &SimilarParams,
        options: Option<CallOptions>,
    ) -> Result<Response<Value>> {
        self.driver
            .block_on(self.inner.get_similar_datasets(entry_id, params, options))
    }

    pub fn iter_search_datasets(
        &self,
        params: SearchParams,
        offset: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Iterator<Item = Result<SearchResponse>> + '_ {
        PageIter::new(offset, limit, move |cursor| {
            let params = SearchParams {
                limit: Some(limit),
                offset: Some(cursor),
                ..params.clone()
            };
            self.search_datasets(&params, options.clone())
                .map(Response::into_data)
        })
    }

    pub fn paginate_search_datasets(
        &self,
        params: SearchParams,
        offset: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Iterator<Item = Result<Hit>> + '_ {
        flatten_items(self.iter_search_datasets(params, offset, limit, options))
    }
}

/// Blocking [`apis::StatisticsApi`].
#[derive(Debug, Clone)]
pub struct StatisticsApi {
    inner: apis::StatisticsApi,
    driver: Driver,
}

impl StatisticsApi {
    pub fn list_namespaces(
        &self,
        params: &StatsListParams,
        options: Option<CallOptions>,
    ) -> Result<Response<StatsPage<Namespace>>> {
        self.driver
            .block_on(self.inner.list_namespaces(params, options))
    }

    pub fn get_namespace(
        &self,
        ns_id: &str,
        options: Option<CallOptions>,
    ) -> Result<Response<Namespace>> {
        self.driver
            .block_on(self.inner.get_namespace(ns_id, options))
    }

    pub fn list_namespace_tables(
        &self,
        ns_id: &str,
        params: &StatsListParams,
        options: Option<CallOptions>,
    ) -> Result<Response<StatsPage<Table>>> {
        self.driver
            .block_on(self.inner.list_namespace_tables(ns_id, params, options))
    }

    pub fn get_namespace_table(
        &self,
        ns_id: &str,
        table_id: &str,
        options: Option<CallOptions>,
    ) -> Result<Response<Table>> {
        self.driver
            .block_on(self.inner.get_namespace_table(ns_id, table_id, options))
    }

    pub fn list_indicators(
        &self,
        ns_id: &str,
        params: &StatsListParams,
        options: Option<CallOptions>,
    ) -> Result<Response<StatsPage<Indicator>>> {
        self.driver
            .block_on(self.inner.list_indicators(ns_id, params, options))
    }

    pub fn get_namespace_indicator(
        &self,
        ns_id: &str,
        ind_id: &str,
        options: Option<CallOptions>,
    ) -> Result<Response<Indicator>> {
        self.driver
            .block_on(self.inner.get_namespace_indicator(ns_id, ind_id, options))
    }

    pub fn list_timeseries(
        &self,
        ns_id: &str,
        params: &StatsListParams,
        options: Option<CallOptions>,
    ) -> Result<Response<StatsPage<Timeseries>>> {
        self.driver
            .block_on(self.inner.list_timeseries(ns_id, params, options))
    }

    pub fn get_timeseries(
        &self,
        ns_id: &str,
        ts_id: &str,
        options: Option<CallOptions>,
    ) -> Result<Response<Timeseries>> {
        self.driver
            .block_on(self.inner.get_timeseries(ns_id, ts_id, options))
    }

    pub fn list_export_formats(&self, options: Option<CallOptions>) -> Result<Response<Value>> {
        self.driver
            .block_on(self.inner.list_export_formats(options))
    }

    /// Downloads a time series export fully into memory.
    pub fn export_timeseries_file(
        &self,
        ns_id: &str,
        ts_id: &str,
        fileext: &str,
        accept: Option<ExportAccept>,
        options: Option<CallOptions>,
    ) -> Result<Bytes> {
        self.driver.block_on(crate::ext::export_timeseries_file_bytes(
            &self.inner,
            ns_id,
            ts_id,
            fileext,
            accept,
            options,
        ))
    }

    /// Downloads a time series export to `path`, creating parent directories.
    pub fn export_timeseries_file_to_path(
        &self,
        ns_id: &str,
        ts_id: &str,
        fileext: &str,
        path: impl AsRef<Path>,
        accept: Option<ExportAccept>,
        options: Option<CallOptions>,
    ) -> Result<PathBuf> {
        self.driver.block_on(crate::ext::export_timeseries_file_to_path(
            &self.inner,
            ns_id,
            ts_id,
            fileext,
            path,
            accept,
            options,
        ))
    }

    pub fn iter_namespaces(
        &self,
        start: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Iterator<Item = Result<StatsPage<Namespace>>> + '_ {
        PageIter::new(start, limit, move |cursor| {
            self.list_namespaces(&StatsListParams::new(cursor, limit), options.clone())
                .map(Response::into_data)
        })
    }

    pub fn paginate_namespaces(
        &self,
        start: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Iterator<Item = Result<Namespace>> + '_ {
        flatten_items(self.iter_namespaces(start, limit, options))
    }

    pub fn iter_namespace_tables<'a>(
        &'a self,
        ns_id: &'a str,
        start: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Iterator<Item = Result<StatsPage<Table>>> + 'a {
        PageIter::new(start, limit, move |cursor| {
            self.list_namespace_tables(ns_id, &StatsListParams::new(cursor, limit), options.clone())
                .map(Response::into_data)
        })
    }

    pub fn paginate_namespace_tables<'a>(
        &'a self,
        ns_id: &'a str,
        start: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Iterator<Item = Result<Table>> + 'a {
        flatten_items(self.iter_namespace_tables(ns_id, start, limit, options))
    }

    pub fn iter_indicators<'a>(
        &'a self,
        ns_id: &'a str,
        start: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Iterator<Item = Result<StatsPage<Indicator>>> + 'a {
        PageIter::new(start, limit, move |cursor| {
            self.list_indicators(ns_id, &StatsListParams::new(cursor, limit), options.clone())
                .map(Response::into_data)
        })
    }

    pub fn paginate_indicators<'a>(
        &'a self,
        ns_id: &'a str,
        start: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Iterator<Item = Result<Indicator>> + 'a {
        flatten_items(self.iter_indicators(ns_id, start, limit, options))
    }

    pub fn iter_timeseries<'a>(
        &'a self,
        ns_id: &'a str,
        start: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Iterator<Item = Result<StatsPage<Timeseries>>> + 'a {
        PageIter::new(start, limit, move |cursor| {
            self.list_timeseries(ns_id, &StatsListParams::new(cursor, limit), options.clone())
                .map(Response::into_data)
        })
    }

    pub fn paginate_timeseries<'a>(
        &'a self,
        ns_id: &'a str,
        start: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Iterator<Item = Result<Timeseries>> + 'a {
        flatten_items(self.iter_timeseries(ns_id, start, limit, options))
    }
}
