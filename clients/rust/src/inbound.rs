use crate::base::{APIResponse, BaseClient};
use reqwest::StatusCode;
use salon_scheduler_api_structs::*;
use salon_scheduler_domain::ID;
use std::sync::Arc;

#[derive(Clone)]
pub struct InboundClient {
    base: Arc<BaseClient>,
}

pub struct InboundBookingInput {
    pub tenant_id: ID,
    pub channel: String,
    pub secret: String,
    /// Webhook payload exactly as the channel sent it
    pub payload: Vec<u8>,
}

impl InboundClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Returns `duplicate: true` when the event was delivered before
    pub async fn book(
        &self,
        input: InboundBookingInput,
    ) -> APIResponse<handle_inbound_booking::APIResponse> {
        self.base
            .post_raw(
                input.payload,
                &[("x-inbound-secret", input.secret.as_str())],
                format!("tenants/{}/inbound/{}", input.tenant_id, input.channel),
                &[StatusCode::CREATED, StatusCode::OK],
            )
            .await
    }
}
