mod appointment;
mod base;
mod inbound;
mod notification;
mod slots;
mod status;

use appointment::AppointmentClient;
pub use appointment::{
    AppointmentInput, CreateAppointmentInput, RescheduleAppointmentInput,
    UpdateAppointmentStatusInput,
};
pub(crate) use base::BaseClient;
pub use base::{APIError, APIResponse};
use inbound::InboundClient;
pub use inbound::InboundBookingInput;
use notification::NotificationClient;
pub use notification::GetConversionStatsInput;
pub use salon_scheduler_api_structs::dtos::*;
pub use salon_scheduler_api_structs::get_available_slots::SlotDTO as Slot;
pub use salon_scheduler_api_structs::get_conversion_stats::ConversionStatsDTO as ConversionStats;
pub use salon_scheduler_domain::{
    AppointmentStatus, ChannelIdentity, ClientIdentity, ReminderJobStatus, ID,
};
use slots::SlotsClient;
pub use slots::GetAvailableSlotsInput;
use status::StatusClient;
use std::sync::Arc;

// Domain
pub use salon_scheduler_api_structs::dtos::AppointmentDTO as Appointment;
pub use salon_scheduler_api_structs::dtos::ReminderJobDTO as ReminderJob;

pub use salon_scheduler_domain::Tz;

/// Salon Scheduler Server SDK
///
/// The SDK contains methods for interacting with the Salon Scheduler server
/// API.
#[derive(Clone)]
pub struct SalonSDK {
    pub appointment: AppointmentClient,
    pub inbound: InboundClient,
    pub notification: NotificationClient,
    pub slots: SlotsClient,
    pub status: StatusClient,
}

impl SalonSDK {
    pub fn new(address: String) -> Self {
        let base = Arc::new(BaseClient::new(address));
        let appointment = AppointmentClient::new(base.clone());
        let inbound = InboundClient::new(base.clone());
        let notification = NotificationClient::new(base.clone());
        let slots = SlotsClient::new(base.clone());
        let status = StatusClient::new(base);

        Self {
            appointment,
            inbound,
            notification,
            slots,
            status,
        }
    }
}
