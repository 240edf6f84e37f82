use salon_scheduler_domain::{Appointment, AppointmentStatus, ReminderJob, ReminderJobStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDTO {
    pub id: ID,
    pub tenant_id: ID,
    pub resource_id: ID,
    pub service_id: ID,
    pub client_id: ID,
    pub start_ts: i64,
    pub end_ts: i64,
    pub status: AppointmentStatus,
    pub created: i64,
    pub updated: i64,
}

impl AppointmentDTO {
    pub fn new(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            tenant_id: appointment.tenant_id,
            resource_id: appointment.resource_id,
            service_id: appointment.service_id,
            client_id: appointment.client_id,
            start_ts: appointment.start_ts,
            end_ts: appointment.end_ts,
            status: appointment.status,
            created: appointment.created,
            updated: appointment.updated,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderJobDTO {
    pub id: ID,
    pub appointment_id: ID,
    pub kind: String,
    pub fire_at: i64,
    pub status: ReminderJobStatus,
}

impl ReminderJobDTO {
    pub fn new(job: ReminderJob) -> Self {
        Self {
            id: job.id,
            appointment_id: job.appointment_id,
            kind: job.kind,
            fire_at: job.fire_at,
            status: job.status,
        }
    }
}
