use crate::base::{APIResponse, BaseClient};
use reqwest::StatusCode;
use salon_scheduler_api_structs::*;
use salon_scheduler_domain::ID;
use std::sync::Arc;

#[derive(Clone)]
pub struct SlotsClient {
    base: Arc<BaseClient>,
}

pub struct GetAvailableSlotsInput {
    pub tenant_id: ID,
    pub service_id: ID,
    /// Local date of the tenant, e.g. 2024-5-10
    pub date: String,
    pub resource_id: Option<ID>,
    pub preferred_ts: Option<i64>,
}

impl SlotsClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn get_available(
        &self,
        input: GetAvailableSlotsInput,
    ) -> APIResponse<get_available_slots::APIResponse> {
        let mut query = format!("date={}", input.date);
        if let Some(resource_id) = input.resource_id {
            query = format!("{}&resourceId={}", query, resource_id);
        }
        if let Some(preferred_ts) = input.preferred_ts {
            query = format!("{}&preferredTs={}", query, preferred_ts);
        }

        self.base
            .get(
                format!(
                    "tenants/{}/services/{}/slots?{}",
                    input.tenant_id, input.service_id, query
                ),
                StatusCode::OK,
            )
            .await
    }
}
