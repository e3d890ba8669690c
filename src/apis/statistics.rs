use crate::{
    base::{BaseSdk, Operation},
    models::{ExportAccept, Indicator, Namespace, StatsListParams, StatsPage, Table, Timeseries},
    pagination,
    request::CallOptions,
    Response, Result,
};
use futures::Stream;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;

const LIST_NAMESPACES: Operation = Operation::get("list_namespaces", "/statsdb/0.1/ns");
const GET_NAMESPACE: Operation = Operation::get("get_namespace", "/statsdb/0.1/ns/{ns_id}");
const LIST_NAMESPACE_TABLES: Operation =
    Operation::get("list_namespace_tables", "/statsdb/0.1/ns/{ns_id}/tables");
const GET_NAMESPACE_TABLE: Operation = Operation::get(
    "get_namespace_table",
    "/statsdb/0.1/ns/{ns_id}/tables/{table_id}",
);
const LIST_INDICATORS: Operation =
    Operation::get("list_indicators", "/statsdb/0.1/ns/{ns_id}/indicators");
const GET_NAMESPACE_INDICATOR: Operation = Operation::get(
    "get_namespace_indicator",
    "/statsdb/0.1/ns/{ns_id}/indicators/{ind_id}",
);
const LIST_TIMESERIES: Operation = Operation::get("list_timeseries", "/statsdb/0.1/ns/{ns_id}/ts");
const GET_TIMESERIES: Operation =
    Operation::get("get_timeseries", "/statsdb/0.1/ns/{ns_id}/ts/{ts_id}");
const LIST_EXPORT_FORMATS: Operation = Operation::get(
    "list_export_formats",
    "/statsdb/0.1/list_exportable_formats",
);
const EXPORT_TIMESERIES_FILE: Operation = Operation::get(
    "export_timeseries_file",
    "/statsdb/0.1/ns/{ns_id}/ts/{ts_id}/export/{fileext}",
);

/// `Accept` sent by [`StatisticsApi::export_timeseries_file`] when none is given.
pub const EXPORT_DEFAULT_ACCEPT: &str = "*/*";

/// Statistics database (`/statsdb/0.1`).
#[derive(Debug, Clone)]
pub struct StatisticsApi {
    base: BaseSdk,
}

impl StatisticsApi {
    pub(crate) fn new(base: BaseSdk) -> Self {
        Self { base }
    }

    async fn list<T: DeserializeOwned>(
        &self,
        op: &Operation,
        ns_id: Option<&str>,
        params: &StatsListParams,
        options: Option<CallOptions>,
    ) -> Result<Response<StatsPage<T>>> {
        let mut descriptor = op.descriptor().with_query(params)?;
        if let Some(ns_id) = ns_id {
            descriptor = descriptor.with_path_param("ns_id", ns_id);
        }
        self.base.execute(op, descriptor, options).await
    }

    /// `GET /statsdb/0.1/ns`
    pub async fn list_namespaces(
        &self,
        params: &StatsListParams,
        options: Option<CallOptions>,
    ) -> Result<Response<StatsPage<Namespace>>> {
        self.list(&LIST_NAMESPACES, None, params, options).await
    }

    /// `GET /statsdb/0.1/ns/{ns_id}`
    pub async fn get_namespace(
        &self,
        ns_id: &str,
        options: Option<CallOptions>,
    ) -> Result<Response<Namespace>> {
        let descriptor = GET_NAMESPACE.descriptor().with_path_param("ns_id", ns_id);
        self.base.execute(&GET_NAMESPACE, descriptor, options).await
    }

    /// `GET /statsdb/0.1/ns/{ns_id}/tables`
    pub async fn list_namespace_tables(
        &self,
        ns_id: &str,
        params: &StatsListParams,
        options: Option<CallOptions>,
    ) -> Result<Response<StatsPage<Table>>> {
        self.list(&LIST_NAMESPACE_TABLES, Some(ns_id), params, options)
            .await
    }

    /// `GET /statsdb/0.1/ns/{ns_id}/tables/{table_id}`
    pub async fn get_namespace_table(
        &self,
        ns_id: &str,
        table_id: &str,
        options: Option<CallOptions>,
    ) -> Result<Response<Table>> {
        let descriptor = GET_NAMESPACE_TABLE
            .descriptor()
            .with_path_param("ns_id", ns_id)
            .with_path_param("table_id", table_id);
        self.base
            .execute(&GET_NAMESPACE_TABLE, descriptor, options)
            .await
    }

    /// `GET /statsdb/0.1/ns/{ns_id}/indicators`
    pub async fn list_indicators(
        &self,
        ns_id: &str,
        params: &StatsListParams,
        options: Option<CallOptions>,
    ) -> Result<Response<StatsPage<Indicator>>> {
        self.list(&LIST_INDICATORS, Some(ns_id), params, options)
            .await
    }

    /// `GET /statsdb/0.1/ns/{ns_id}/indicators/{ind_id}`
    pub async fn get_namespace_indicator(
        &self,
        ns_id: &str,
        ind_id: &str,
        options: Option<CallOptions>,
    ) -> Result<Response<Indicator>> {
        let descriptor = GET_NAMESPACE_INDICATOR
            .descriptor()
            .with_path_param("ns_id", ns_id)
            .with_path_param("ind_id", ind_id);
        self.base
            .execute(&GET_NAMESPACE_INDICATOR, descriptor, options)
            .await
    }

    /// `GET /statsdb/0.1/ns/{ns_id}/ts`
    pub async fn list_timeseries(
        &self,
        ns_id: &str,
        params: &StatsListParams,
        options: Option<CallOptions>,
    ) -> Result<Response<StatsPage<Timeseries>>> {
        self.list(&LIST_TIMESERIES, Some(ns_id), params, options)
            .await
    }

    /// `GET /statsdb/0.1/ns/{ns_id}/ts/{ts_id}`
    pub async fn get_timeseries(
        &self,
        ns_id: &str,
        ts_id: &str,
        options: Option<CallOptions>,
    ) -> Result<Response<Timeseries>> {
        let descriptor = GET_TIMESERIES
            .descriptor()
            .with_path_param("ns_id", ns_id)
            .with_path_param("ts_id", ts_id);
        self.base
            .execute(&GET_TIMESERIES, descriptor, options)
            .await
    }

    /// `GET /statsdb/0.1/list_exportable_formats`
    pub async fn list_export_formats(
        &self,
        options: Option<CallOptions>,
    ) -> Result<Response<Value>> {
        self.base
            .execute(
                &LIST_EXPORT_FORMATS,
                LIST_EXPORT_FORMATS.descriptor(),
                options,
            )
            .await
    }

    /// `GET /statsdb/0.1/ns/{ns_id}/ts/{ts_id}/export/{fileext}`
    ///
    /// The body is left on the connection; read it with
    /// [`reqwest::Response::chunk`] or use the helpers in [`crate::ext`].
    pub async fn export_timeseries_file(
        &self,
        ns_id: &str,
        ts_id: &str,
        fileext: &str,
        accept: Option<ExportAccept>,
        options: Option<CallOptions>,
    ) -> Result<reqwest::Response> {
        let descriptor = EXPORT_TIMESERIES_FILE
            .descriptor()
            .with_path_param("ns_id", ns_id)
            .with_path_param("ts_id", ts_id)
            .with_path_param("fileext", fileext)
            .accept(accept.map_or(EXPORT_DEFAULT_ACCEPT, |a| a.as_str()));
        self.base
            .execute_stream(&EXPORT_TIMESERIES_FILE, descriptor, options)
            .await
    }

    fn pages<'a, T, F, Fut>(
        start: u64,
        limit: u64,
        options: Option<CallOptions>,
        mut fetch: F,
    ) -> impl Stream<Item = Result<StatsPage<T>>> + 'a
    where
        T: 'a,
        F: FnMut(StatsListParams, Option<CallOptions>) -> Fut + 'a,
        Fut: Future<Output = Result<Response<StatsPage<T>>>> + 'a,
    {
        pagination::pages(start, limit, move |cursor| {
            let fut = fetch(StatsListParams::new(cursor, limit), options.clone());
            async move { fut.await.map(Response::into_data) }
        })
    }

    /// Pages of [`list_namespaces`](Self::list_namespaces).
    pub fn iter_namespaces(
        &self,
        start: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Stream<Item = Result<StatsPage<Namespace>>> + '_ {
        Self::pages(start, limit, options, move |params, options| async move {
            self.list_namespaces(&params, options).await
        })
    }

    /// Every namespace, across pages.
    pub fn paginate_namespaces(
        &self,
        start: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Stream<Item = Result<Namespace>> + '_ {
        pagination::items(self.iter_namespaces(start, limit, options))
    }

    /// Pages of [`list_namespace_tables`](Self::list_namespace_tables).
    pub fn iter_namespace_tables<'a>(
        &'a self,
        ns_id: &'a str,
        start: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Stream<Item = Result<StatsPage<Table>>> + 'a {
        Self::pages(start, limit, options, move |params, options| async move {
            self.list_namespace_tables(ns_id, &params, options).await
        })
    }

    /// Every table of `ns_id`, across pages.
    pub fn paginate_namespace_tables<'a>(
        &'a self,
        ns_id: &'a str,
        start: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Stream<Item = Result<Table>> + 'a {
        pagination::items(self.iter_namespace_tables(ns_id, start, limit, options))
    }

    /// Pages of [`list_indicators`](Self::list_indicators).
    pub fn iter_indicators<'a>(
        &'a self,
        ns_id: &'a str,
        start: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Stream<Item = Result<StatsPage<Indicator>>> + 'a {
        Self::pages(start, limit, options, move |params, options| async move {
            self.list_indicators(ns_id, &params, options).await
        })
    }

    /// Every indicator of `ns_id`, across pages.
    pub fn paginate_indicators<'a>(
        &'a self,
        ns_id: &'a str,
        start: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Stream<Item = Result<Indicator>> + 'a {
        pagination::items(self.iter_indicators(ns_id, start, limit, options))
    }

    /// Pages of [`list_timeseries`](Self::list_timeseries).
    pub fn iter_timeseries<'a>(
        &'a self,
        ns_id: &'a str,
        start: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Stream<Item = Result<StatsPage<Timeseries>>> + 'a {
        Self::pages(start, limit, options, move |params, options| async move {
            self.list_timeseries(ns_id, &params, options).await
        })
    }

    /// Every time series of `ns_id`, across pages.
    pub fn paginate_timeseries<'a>(
        &'a self,
        ns_id: &'a str,
        start: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Stream<Item = Result<Timeseries>> + 'a {
        pagination::items(self.iter_timeseries(ns_id, start, limit, options))
    }
}
