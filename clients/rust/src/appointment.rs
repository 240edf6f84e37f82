use crate::base::{APIResponse, BaseClient};
use reqwest::StatusCode;
use salon_scheduler_api_structs::*;
use salon_scheduler_domain::{AppointmentStatus, ClientIdentity, ID};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppointmentClient {
    base: Arc<BaseClient>,
}

pub struct CreateAppointmentInput {
    pub tenant_id: ID,
    pub resource_id: ID,
    pub service_id: ID,
    pub client: ClientIdentity,
    pub start_ts: i64,
}

pub struct AppointmentInput {
    pub tenant_id: ID,
    pub appointment_id: ID,
}

pub struct UpdateAppointmentStatusInput {
    pub tenant_id: ID,
    pub appointment_id: ID,
    pub status: AppointmentStatus,
}

pub struct RescheduleAppointmentInput {
    pub tenant_id: ID,
    pub appointment_id: ID,
    pub start_ts: i64,
    pub resource_id: Option<ID>,
}

impl AppointmentClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(
        &self,
        input: CreateAppointmentInput,
    ) -> APIResponse<create_appointment::APIResponse> {
        let body = create_appointment::RequestBody {
            resource_id: input.resource_id,
            service_id: input.service_id,
            client: input.client,
            start_ts: input.start_ts,
        };

        self.base
            .post(
                body,
                format!("tenants/{}/appointments", input.tenant_id),
                StatusCode::CREATED,
            )
            .await
    }

    pub async fn get(&self, input: AppointmentInput) -> APIResponse<get_appointment::APIResponse> {
        self.base
            .get(
                format!(
                    "tenants/{}/appointments/{}",
                    input.tenant_id, input.appointment_id
                ),
                StatusCode::OK,
            )
            .await
    }

    pub async fn cancel(
        &self,
        input: AppointmentInput,
    ) -> APIResponse<cancel_appointment::APIResponse> {
        self.base
            .post(
                (),
                format!(
                    "tenants/{}/appointments/{}/cancel",
                    input.tenant_id, input.appointment_id
                ),
                StatusCode::OK,
            )
            .await
    }

    pub async fn update_status(
        &self,
        input: UpdateAppointmentStatusInput,
    ) -> APIResponse<update_appointment_status::APIResponse> {
        let body = update_appointment_status::RequestBody {
            status: input.status,
        };

        self.base
            .put(
                body,
                format!(
                    "tenants/{}/appointments/{}/status",
                    input.tenant_id, input.appointment_id
                ),
                StatusCode::OK,
            )
            .await
    }

    pub async fn reschedule(
        &self,
        input: RescheduleAppointmentInput,
    ) -> APIResponse<reschedule_appointment::APIResponse> {
        let body = reschedule_appointment::RequestBody {
            start_ts: input.start_ts,
            resource_id: input.resource_id,
        };

        self.base
            .post(
                body,
                format!(
                    "tenants/{}/appointments/{}/reschedule",
                    input.tenant_id, input.appointment_id
                ),
                StatusCode::CREATED,
            )
            .await
    }

    pub async fn get_reminders(
        &self,
        input: AppointmentInput,
    ) -> APIResponse<get_appointment_reminders::APIResponse> {
        self.base
            .get(
                format!(
                    "tenants/{}/appointments/{}/reminders",
                    input.tenant_id, input.appointment_id
                ),
                StatusCode::OK,
            )
            .await
    }
}
