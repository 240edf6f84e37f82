use crate::dtos::{AppointmentDTO, ReminderJobDTO};
use salon_scheduler_domain::{Appointment, AppointmentStatus, ClientIdentity, ReminderJob, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug)]
pub struct AppointmentResponse {
    pub appointment: AppointmentDTO,
}

impl AppointmentResponse {
    pub fn new(appointment: Appointment) -> Self {
        Self {
            appointment: AppointmentDTO::new(appointment),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct AppointmentPathParams {
    pub tenant_id: ID,
    pub appointment_id: ID,
}

pub mod create_appointment {
    use super::*;

    #[derive(Deserialize, Debug)]
    pub struct PathParams {
        pub tenant_id: ID,
    }

    #[derive(Deserialize, Serialize, Debug, Clone)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub resource_id: ID,
        pub service_id: ID,
        pub client: ClientIdentity,
        pub start_ts: i64,
    }

    pub type APIResponse = AppointmentResponse;
}

pub mod get_appointment {
    use super::*;

    pub type PathParams = AppointmentPathParams;

    pub type APIResponse = AppointmentResponse;
}

pub mod cancel_appointment {
    use super::*;

    pub type PathParams = AppointmentPathParams;

    pub type APIResponse = AppointmentResponse;
}

pub mod update_appointment_status {
    use super::*;

    pub type PathParams = AppointmentPathParams;

    #[derive(Deserialize, Serialize, Debug, Clone)]
    #[serde(rename_all = "camelCase", deny_unknown_fields)]
    pub struct RequestBody {
        pub status: AppointmentStatus,
    }

    pub type APIResponse = AppointmentResponse;
}

pub mod reschedule_appointment {
    use super::*;

    pub type PathParams = AppointmentPathParams;

    #[derive(Deserialize, Serialize, Debug, Clone)]
    #[serde(rename_all = "camelCase", deny_unknown_fields)]
    pub struct RequestBody {
        pub start_ts: i64,
        /// Keeps the current resource when missing
        #[serde(default)]
        pub resource_id: Option<ID>,
    }

    #[derive(Deserialize, Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub cancelled: AppointmentDTO,
        pub appointment: AppointmentDTO,
    }

    impl APIResponse {
        pub fn new(cancelled: Appointment, appointment: Appointment) -> Self {
            Self {
                cancelled: AppointmentDTO::new(cancelled),
                appointment: AppointmentDTO::new(appointment),
            }
        }
    }
}

pub mod get_appointment_reminders {
    use super::*;

    pub type PathParams = AppointmentPathParams;

    #[derive(Deserialize, Serialize, Debug)]
    pub struct APIResponse {
        pub reminders: Vec<ReminderJobDTO>,
    }

    impl APIResponse {
        pub fn new(reminders: Vec<ReminderJob>) -> Self {
            Self {
                reminders: reminders.into_iter().map(ReminderJobDTO::new).collect(),
            }
        }
    }
}
