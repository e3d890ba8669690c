use crate::{
    base::{BaseSdk, Operation},
    models::SearchIndexEntry,
    request::CallOptions,
    security::API_KEY_QUERY_PARAM,
    Response, Result,
};

const GET_RAW_ENTRY_BY_ID: Operation =
    Operation::get("get_raw_entry_by_id", "/raw/0.1/entry/{entry_id}");

/// Raw, unprocessed index records.
#[derive(Debug, Clone)]
pub struct RawDataAccessApi {
    base: BaseSdk,
}

impl RawDataAccessApi {
    pub(crate) fn new(base: BaseSdk) -> Self {
        Self { base }
    }

    /// `GET /raw/0.1/entry/{entry_id}`
    ///
    /// `apikey` is sent as a query parameter. A key configured on the SDK
    /// replaces it.
    pub async fn get_raw_entry_by_id(
        &self,
        entry_id: &str,
        apikey: Option<&str>,
        options: Option<CallOptions>,
    ) -> Result<Response<SearchIndexEntry>> {
        let mut descriptor = GET_RAW_ENTRY_BY_ID
            .descriptor()
            .with_path_param("entry_id", entry_id);
        if let Some(key) = apikey {
            descriptor = descriptor.with_query_param(API_KEY_QUERY_PARAM, key);
        }

        self.base
            .execute(&GET_RAW_ENTRY_BY_ID, descriptor, options)
            .await
    }
}
