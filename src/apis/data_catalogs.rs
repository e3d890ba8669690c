use crate::{
    base::{BaseSdk, Operation},
    models::{DataCatalog, DataCatalogSearchResponse, ListCatalogsParams},
    pagination,
    request::CallOptions,
    Response, Result,
};
use futures::Stream;

const GET_CATALOG_BY_ID: Operation =
    Operation::get("get_catalog_by_id", "/registry/catalog/{catalog_id}");
const LIST_CATALOGS: Operation = Operation::get("list_catalogs", "/registry/search/catalogs/");

/// Data catalog registry.
#[derive(Debug, Clone)]
pub struct DataCatalogsApi {
    base: BaseSdk,
}

impl DataCatalogsApi {
    pub(crate) fn new(base: BaseSdk) -> Self {
        Self { base }
    }

    /// `GET /registry/catalog/{catalog_id}`
    pub async fn get_catalog_by_id(
        &self,
        catalog_id: &str,
        options: Option<CallOptions>,
    ) -> Result<Response<DataCatalog>> {
        let descriptor = GET_CATALOG_BY_ID
            .descriptor()
            .with_path_param("catalog_id", catalog_id);
        self.base
            .execute(&GET_CATALOG_BY_ID, descriptor, options)
            .await
    }

    /// `GET /registry/search/catalogs/`
    pub async fn list_catalogs(
        &self,
        params: &ListCatalogsParams,
        options: Option<CallOptions>,
    ) -> Result<Response<DataCatalogSearchResponse>> {
        let descriptor = LIST_CATALOGS.descriptor().with_query(params)?;
        self.base.execute(&LIST_CATALOGS, descriptor, options).await
    }

    /// Pages of [`list_catalogs`](Self::list_catalogs), `limit` apart from `offset`.
    pub fn iter_catalogs<'a>(
        &'a self,
        q: Option<&'a str>,
        offset: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Stream<Item = Result<DataCatalogSearchResponse>> + 'a {
        pagination::pages(offset, limit, move |cursor| {
            let params = ListCatalogsParams {
                q: q.map(String::from),
                limit: Some(limit),
                offset: Some(cursor),
            };
            let options = options.clone();
            async move {
                self.list_catalogs(&params, options)
                    .await
                    .map(Response::into_data)
            }
        })
    }

    /// Every catalog matching `q`, across pages.
    pub fn paginate_catalogs<'a>(
        &'a self,
        q: Option<&'a str>,
        offset: u64,
        limit: u64,
        options: Option<CallOptions>,
    ) -> impl Stream<Item = Result<DataCatalog>> + 'a {
        pagination::items(self.iter_catalogs(q, offset, limit, options))
    }
}
