use crate::{
    quiet_hours::QuietHours,
    reminder::ReminderOffset,
    shared::entity::{Entity, ID},
};
use chrono_tz::{Tz, UTC};
use serde::{Deserialize, Serialize};

/// An isolated business account. Every other entity is scoped by a `Tenant`.
#[derive(Debug, Clone)]
pub struct Tenant {
    pub id: ID,
    pub name: String,
    pub settings: TenantSettings,
}

impl Tenant {
    pub fn new(name: &str) -> Self {
        Self {
            id: Default::default(),
            name: name.into(),
            settings: Default::default(),
        }
    }
}

impl Entity for Tenant {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// Local hours outside of which a slot is considered offpeak
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OffpeakWindow {
    pub morning_end_hour: u32,
    pub evening_start_hour: u32,
}

impl Default for OffpeakWindow {
    fn default() -> Self {
        Self {
            morning_end_hour: 11,
            evening_start_hour: 19,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TenantSettings {
    pub timezone: Tz,
    pub quiet_hours: QuietHours,
    /// Grid that slot starts must be aligned to and that packing is measured in
    pub grid_minutes: i64,
    /// Distance between generated slot starts. Defaults to the service duration.
    pub slot_step_minutes: Option<i64>,
    /// Padding kept free around existing bookings, unless the service sets its own
    pub buffer_minutes: i64,
    pub offpeak: OffpeakWindow,
    pub reminder_offsets: Vec<ReminderOffset>,
    pub suggestion_limit: usize,
}

impl Default for TenantSettings {
    fn default() -> Self {
        Self {
            timezone: UTC,
            quiet_hours: Default::default(),
            grid_minutes: 15,
            slot_step_minutes: None,
            buffer_minutes: 0,
            offpeak: Default::default(),
            reminder_offsets: ReminderOffset::defaults(),
            suggestion_limit: 10,
        }
    }
}
