use crate::dtos::AppointmentDTO;
use salon_scheduler_domain::{Appointment, ID};
use serde::{Deserialize, Serialize};

pub mod handle_inbound_booking {
    use super::*;

    #[derive(Deserialize, Debug)]
    pub struct PathParams {
        pub tenant_id: ID,
        pub channel: String,
    }

    #[derive(Deserialize, Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        /// The event was already processed and nothing was booked
        pub duplicate: bool,
        pub appointment: Option<AppointmentDTO>,
    }

    impl APIResponse {
        pub fn booked(appointment: Appointment) -> Self {
            Self {
                duplicate: false,
                appointment: Some(AppointmentDTO::new(appointment)),
            }
        }

        pub fn duplicate() -> Self {
            Self {
                duplicate: true,
                appointment: None,
            }
        }
    }
}
