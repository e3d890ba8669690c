use crate::{
    base::{BaseSdk, Operation},
    models::{
        FacetValuesParams, Hit, SearchDslParams, SearchIndexEntry, SearchParams, SearchResponse,
        SimilarParams,
    },
    pagination,
    request::{CallOptions, RequestBody},
    Response, Result,
};
use futures::Stream;
use serde_json::Value;

const SEARCH_DATASETS: Operation = Operation::get("search_datasets", "/search/0.2/query");
const GET_DATASET_BY_ENTRY_ID: Operation =
    Operation::get("get_dataset_by_entry_id", "/search/0.1/entry/{entry_id}");
const SEARCH_DATASETS_DSL: Operation =
    Operation::post_with_body("search_datasets_dsl", "/search/0.2/es_search");
const LIST_SEARCH_FACETS: Operation =
    Operation::get("list_search_facets", "/search/0.2/list_facets");
const GET_SEARCH_FACET_VALUES: Operation =
    Operation::get("get_search_facet_values", "/search/0.2/get_facet");
const GET_SIMILAR_DATASETS: Operation =
    Operation::get("get_similar_datasets", "/search/0.2/similar/{entry_id}");

/// Dataset search.
#[derive(Debug, Clone)]
pub struct SearchApi {
    base: BaseSdk,
}

impl SearchApi {
    pub(crate) fn new(base: BaseSdk) -> Self {
        Self { base }
    }

    /// `GET /search/0.2/query`
    pub async fn search_datasets(
        &self,
        params: &SearchParams,
        options: Option<CallOptions>,
    ) -> Result<Response<SearchResponse>> {
        let descriptor = SEARCH_DATASETS.descriptor().with_query(params)?;
        self.base
            .execute(&SEARCH_DATASETS, descriptor, options)
            .await
    }

    /// `GET /search/0.1/entry/{entry_id}`
    pub async fn get_dataset_by_entry_id(
        &self,
        entry_id: &str,
        options: Option<CallOptions>,
    ) -> Result<Response<SearchIndexEntry>> {
        let descriptor = GET_DATASET_BY_ENTRY_ID
            .descriptor()
            .with_path_param("entry_id", entry_id);
        self.base
            .execute(&GET_DATASET_BY_ENTRY_ID, descriptor, options)
            .await
    }

    /// `POST /search/0.2/es_search` with an Elasticsearch query DSL body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequestBodyRequired`](crate::Error::RequestBodyRequired)
    /// without sending anything when `body` is `None`.
    pub async fn search_datasets_dsl(
        &self,
        params: &SearchDslParams,
        body: Option<&Value>,
        options: Option<CallOptions>,
    ) -> Result<Response<SearchResponse>> {
        let body = body.map(RequestBody::json).transpose()?;
        let descriptor = SEARCH_DATASETS_DSL
            .descriptor()
            .with_query(params)?
            .with_body(body);
        self.base
            .execute(&SEARCH_DATASETS_DSL, descriptor, options)
            .await
    }

    /// `GET /search/0.2/list_facets`
    pub async fn list_search_facets(
        &self,
        options: Option<CallOptions>,
    ) -> Result<Response<Value>> {
        self.base
            .execute(
                &LIST_SEARCH_FACETS,
                LIST_SEARCH_FACETS.descriptor(),
                options,
            )
            .await
    }

    /// `GET /search/0.2/get_facet`
    pub async fn get_search_facet_values(
        &self,
        params: &FacetValuesParams,
        options: Option<CallOptions>,
    ) -> Result<Response<Value>> {
        let descriptor = GET_SEARCH_FACET_VALUES.descriptor().with_query(params)?;
        self.base
            .execute(&GET_SEARCH_FACET_VALUES, descriptor, options)
            .await
    }

    /// `GET /search/0.2/similar/{entry_id}`
    pub async fn get_similar_datasets(
        &self,
        entry_id: &str,
        params: &SimilarParams,
        options: Option<CallOptions>,
    ) -> Result<Response<Value>> {
        let descriptor = GET_SIMILAR_DATASETS
            .descriptor()
            .with_path_param("entry_id", entry_id)
            .with_query(params)?;
        self.base
            .execute(&GET_SIMILAR_DATASETS, descriptor, options)
            .await
    }

    /// Pages of [`search_datasets`](Self::search_datasets).
    ///
    /// `params` supplies the query, facets and sort order; its `limit` and
    /// `offset` are replaced by the cursor.
    pub fn iter_search_datasets<'a>(
        &'a self,
        params: SearchParams,
        offset: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Stream<Item = Result<SearchResponse>> + 'a {
        pagination::pages(offset, limit, move |cursor| {
            let params = SearchParams {
                limit: Some(limit),
                offset: Some(cursor),
                ..params.clone()
            };
            let options = options.clone();
            async move {
                self.search_datasets(&params, options)
                    .await
                    .map(Response::into_data)
            }
        })
    }

    /// Every hit for `params`, across pages.
    pub fn paginate_search_datasets<'a>(
        &'a self,
        params: SearchParams,
        offset: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Stream<Item = Result<Hit>> + 'a {
        pagination::items(self.iter_search_datasets(params, offset, limit, options))
    }
}
