use crate::{appointment::Appointment, shared::entity::ID};

/// An occupied interval `[start_ts, end_ts)` of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyInterval {
    pub start_ts: i64,
    pub end_ts: i64,
}

impl BusyInterval {
    pub fn new(start_ts: i64, end_ts: i64) -> Self {
        Self { start_ts, end_ts }
    }

    /// Extends the interval by the given millis on each side
    pub fn inflate(&self, before: i64, after: i64) -> Self {
        Self {
            start_ts: self.start_ts - before,
            end_ts: self.end_ts + after,
        }
    }

    pub fn overlaps(&self, start_ts: i64, end_ts: i64) -> bool {
        self.start_ts < end_ts && self.end_ts > start_ts
    }
}

impl From<&Appointment> for BusyInterval {
    fn from(a: &Appointment) -> Self {
        Self::new(a.start_ts, a.end_ts)
    }
}

/// Busy intervals of the active appointments, optionally ignoring one of them
pub fn busy_intervals(appointments: &[Appointment], exclude: Option<&ID>) -> Vec<BusyInterval> {
    appointments
        .iter()
        .filter(|a| a.is_active())
        .filter(|a| exclude.map(|id| a.id != *id).unwrap_or(true))
        .map(BusyInterval::from)
        .collect()
}

pub fn is_free(start_ts: i64, end_ts: i64, busy: &[BusyInterval]) -> bool {
    !busy.iter().any(|b| b.overlaps(start_ts, end_ts))
}

/// First active appointment overlapping `[start_ts, end_ts)`.
///
/// Appointments are expected to belong to a single resource. Terminal
/// appointments and the one with id `exclude` never conflict.
pub fn find_conflict<'a>(
    start_ts: i64,
    end_ts: i64,
    appointments: &'a [Appointment],
    exclude: Option<&ID>,
) -> Option<&'a Appointment> {
    appointments
        .iter()
        .filter(|a| a.is_active())
        .filter(|a| exclude.map(|id| a.id != *id).unwrap_or(true))
        .find(|a| a.start_ts < end_ts && a.end_ts > start_ts)
}

pub fn has_conflict(
    start_ts: i64,
    end_ts: i64,
    appointments: &[Appointment],
    exclude: Option<&ID>,
) -> bool {
    find_conflict(start_ts, end_ts, appointments, exclude).is_some()
}
