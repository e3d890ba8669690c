use crate::{
    base::{BaseSdk, Operation},
    models::HealthStatus,
    request::CallOptions,
    Response, Result,
};

const GET_HEALTHZ: Operation = Operation::get("get_healthz", "/healthz");

/// Service health.
#[derive(Debug, Clone)]
pub struct ServiceApi {
    base: BaseSdk,
}

impl ServiceApi {
    pub(crate) fn new(base: BaseSdk) -> Self {
        Self { base }
    }

    /// `GET /healthz`
    pub async fn get_healthz(
        &self,
        options: Option<CallOptions>,
    ) -> Result<Response<HealthStatus>> {
        self.base
            .execute(&GET_HEALTHZ, GET_HEALTHZ.descriptor(), options)
            .await
    }
}
