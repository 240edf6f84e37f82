mod appointment;
pub mod booking_slots;
mod client;
pub mod conflict;
pub mod conversion_stats;
mod date;
mod inbound;
mod notification;
mod quiet_hours;
mod reminder;
mod resource;
mod service;
mod shared;
pub mod slot_scoring;
mod tenant;

pub use appointment::{Appointment, AppointmentStatus, InvalidStatusError, InvalidTransition};
pub use client::{ChannelIdentity, Client, ClientIdentity};
pub use date::{
    format_date, is_valid_date, local_to_timestamp, to_local, Day, DAY_MILLIS, HOUR_MILLIS,
    MINUTE_MILLIS,
};
pub use inbound::{CanonicalJsonAdapter, ChannelAdapter, InboundBookingRequest, InboundError};
pub use notification::{
    assign_variant, builtin_template, render_template, AssignedTemplate, NotificationLog,
    NotificationStatus, NotificationTemplate, TemplateVariables, DEFAULT_VARIANT_KEY,
};
pub use quiet_hours::QuietHours;
pub use reminder::{
    plan_reminders, reminder_dedupe_key, PlannedReminder, ReminderJob, ReminderJobStatus,
    ReminderOffset, SchedulingError, REMINDER_1H, REMINDER_24H,
};
pub use resource::{Resource, WorkingHours};
pub use service::Service;
pub use shared::entity::{Entity, ID};
pub use shared::time::Time;
pub use tenant::{OffpeakWindow, Tenant, TenantSettings};

pub use chrono::Weekday;
pub use chrono_tz::Tz;
