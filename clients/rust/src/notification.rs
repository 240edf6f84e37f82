use crate::base::{APIResponse, BaseClient};
use reqwest::StatusCode;
use salon_scheduler_api_structs::*;
use salon_scheduler_domain::ID;
use std::sync::Arc;

#[derive(Clone)]
pub struct NotificationClient {
    base: Arc<BaseClient>,
}

pub struct GetConversionStatsInput {
    pub tenant_id: ID,
    pub channel: String,
    pub notification_type: String,
    pub from_ts: Option<i64>,
    pub to_ts: Option<i64>,
}

impl NotificationClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn get_conversion_stats(
        &self,
        input: GetConversionStatsInput,
    ) -> APIResponse<get_conversion_stats::APIResponse> {
        let mut query = format!("channel={}&type={}", input.channel, input.notification_type);
        if let Some(from_ts) = input.from_ts {
            query = format!("{}&fromTs={}", query, from_ts);
        }
        if let Some(to_ts) = input.to_ts {
            query = format!("{}&toTs={}", query, to_ts);
        }

        self.base
            .get(
                format!("tenants/{}/notifications/stats?{}", input.tenant_id, query),
                StatusCode::OK,
            )
            .await
    }
}
