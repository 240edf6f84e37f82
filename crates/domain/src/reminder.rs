use crate::{
    appointment::Appointment,
    date::MINUTE_MILLIS,
    quiet_hours::QuietHours,
    shared::entity::{Entity, ID},
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub const REMINDER_24H: &str = "reminder_24h";
pub const REMINDER_1H: &str = "reminder_1h";

/// A named lead time before the start of an `Appointment` at which
/// the client should be reminded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderOffset {
    pub kind: String,
    pub minutes: i64,
}

impl ReminderOffset {
    pub fn new(kind: &str, minutes: i64) -> Self {
        Self {
            kind: kind.into(),
            minutes,
        }
    }

    pub fn defaults() -> Vec<Self> {
        vec![Self::new(REMINDER_24H, 24 * 60), Self::new(REMINDER_1H, 60)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderJobStatus {
    Pending,
    Fired,
    Cancelled,
}

impl ReminderJobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fired => "fired",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for ReminderJobStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "fired" => Ok(Self::Fired),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(anyhow::Error::msg(format!("Unknown reminder status: {}", s))),
        }
    }
}

/// A `ReminderJob` is a notification to the client of an `Appointment`
/// that should go out at `fire_at`.
///
/// At most one job that is not cancelled exists per `dedupe_key`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderJob {
    pub id: ID,
    pub tenant_id: ID,
    pub appointment_id: ID,
    pub kind: String,
    pub fire_at: i64,
    pub dedupe_key: String,
    pub status: ReminderJobStatus,
    pub created: i64,
}

impl ReminderJob {
    pub fn new(appointment: &Appointment, planned: PlannedReminder, now: i64) -> Self {
        Self {
            id: Default::default(),
            tenant_id: appointment.tenant_id.clone(),
            appointment_id: appointment.id.clone(),
            kind: planned.kind,
            fire_at: planned.fire_at,
            dedupe_key: planned.dedupe_key,
            status: ReminderJobStatus::Pending,
            created: now,
        }
    }
}

impl Entity for ReminderJob {
    fn id(&self) -> &ID {
        &self.id
    }
}

pub fn reminder_dedupe_key(tenant_id: &ID, appointment_id: &ID, kind: &str) -> String {
    format!("reminder:{}:{}:{}", tenant_id, appointment_id, kind)
}

#[derive(Error, Debug, PartialEq)]
pub enum SchedulingError {
    #[error("Timestamp {0} has no valid local time")]
    InvalidLocalTime(i64),
    #[error("Moving timestamp {0} out of quiet hours needs more than one day")]
    ShiftExceedsBound(i64),
    #[error("Reminder {kind} would fire at {fire_at}, which is not before the appointment start {start_ts}")]
    NotBeforeStart {
        kind: String,
        fire_at: i64,
        start_ts: i64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedReminder {
    pub kind: String,
    pub fire_at: i64,
    pub dedupe_key: String,
}

/// Computes when each reminder of the appointment should fire.
///
/// Offsets whose naive fire time is not in the future are left out. The others
/// are moved out of quiet hours, and an offset that cannot be placed before the
/// appointment start yields a `SchedulingError`.
pub fn plan_reminders(
    appointment: &Appointment,
    offsets: &[ReminderOffset],
    quiet_hours: &QuietHours,
    tz: &Tz,
    now: i64,
) -> Vec<Result<PlannedReminder, SchedulingError>> {
    offsets
        .iter()
        .filter(|offset| offset.minutes > 0)
        .map(|offset| (offset, appointment.start_ts - offset.minutes * MINUTE_MILLIS))
        .filter(|(_, fire_at)| *fire_at > now)
        .map(|(offset, fire_at)| {
            let fire_at = quiet_hours.shift_out(fire_at, tz)?;
            if fire_at >= appointment.start_ts {
                return Err(SchedulingError::NotBeforeStart {
                    kind: offset.kind.clone(),
                    fire_at,
                    start_ts: appointment.start_ts,
                });
            }
            Ok(PlannedReminder {
                kind: offset.kind.clone(),
                fire_at,
                dedupe_key: reminder_dedupe_key(&appointment.tenant_id, &appointment.id, &offset.kind),
            })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{appointment::AppointmentStatus, shared::time::Time};
    use chrono::prelude::*;

    fn appointment_at(start_ts: i64) -> Appointment {
        Appointment {
            id: Default::default(),
            tenant_id: Default::default(),
            resource_id: Default::default(),
            service_id: Default::default(),
            client_id: Default::default(),
            start_ts,
            end_ts: start_ts + 60 * MINUTE_MILLIS,
            status: AppointmentStatus::Scheduled,
            created: 0,
            updated: 0,
        }
    }

    #[test]
    fn it_plans_reminders_before_start() {
        let tz = chrono_tz::Europe::Oslo;
        let quiet = QuietHours::new(Time::new(22, 0), Time::new(8, 0));
        let start = tz.with_ymd_and_hms(2024, 5, 10, 15, 0, 0).unwrap().timestamp_millis();
        let appointment = appointment_at(start);
        let now = start - 7 * 24 * 60 * MINUTE_MILLIS;

        let planned = plan_reminders(&appointment, &ReminderOffset::defaults(), &quiet, &tz, now);
        assert_eq!(planned.len(), 2);
        let day_before = planned[0].as_ref().unwrap();
        assert_eq!(day_before.kind, REMINDER_24H);
        assert_eq!(
            day_before.fire_at,
            tz.with_ymd_and_hms(2024, 5, 9, 15, 0, 0).unwrap().timestamp_millis()
        );
        assert_eq!(
            day_before.dedupe_key,
            format!("reminder:{}:{}:reminder_24h", appointment.tenant_id, appointment.id)
        );
        assert_eq!(planned[1].as_ref().unwrap().fire_at, start - 60 * MINUTE_MILLIS);
    }

    #[test]
    fn it_skips_reminders_in_the_past() {
        let tz = chrono_tz::UTC;
        let quiet = QuietHours::new(Time::new(22, 0), Time::new(8, 0));
        let start = tz.with_ymd_and_hms(2024, 5, 10, 15, 0, 0).unwrap().timestamp_millis();
        let appointment = appointment_at(start);
        // Booked three hours before start
        let now = start - 3 * 60 * MINUTE_MILLIS;

        let planned = plan_reminders(&appointment, &ReminderOffset::defaults(), &quiet, &tz, now);
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].as_ref().unwrap().kind, REMINDER_1H);
    }

    #[test]
    fn it_rejects_reminders_pushed_past_start() {
        let tz = chrono_tz::UTC;
        let quiet = QuietHours::new(Time::new(22, 0), Time::new(8, 0));
        // The 1h reminder for an 08:00 appointment falls at 07:00, which is quiet
        let start = tz.with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap().timestamp_millis();
        let appointment = appointment_at(start);
        let now = start - 2 * 24 * 60 * MINUTE_MILLIS;

        let planned = plan_reminders(&appointment, &[ReminderOffset::new(REMINDER_1H, 60)], &quiet, &tz, now);
        assert_eq!(planned.len(), 1);
        assert!(matches!(
            planned[0],
            Err(SchedulingError::NotBeforeStart { .. })
        ));
    }
}
