use crate::{
    date::{local_to_timestamp, to_local, DAY_MILLIS},
    reminder::SchedulingError,
    shared::time::Time,
};
use chrono::{Duration, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Local time window `[start, end)` in which no reminder may fire.
///
/// The window wraps midnight when `start > end`. An empty window
/// (`start == end`) is never quiet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuietHours {
    pub start: Time,
    pub end: Time,
}

impl Default for QuietHours {
    fn default() -> Self {
        Self {
            start: Time::new(22, 0),
            end: Time::new(9, 0),
        }
    }
}

impl QuietHours {
    pub fn new(start: Time, end: Time) -> Self {
        Self { start, end }
    }

    fn wraps_midnight(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, local: NaiveTime) -> bool {
        let t = Time::from(local);
        if self.start == self.end {
            false
        } else if self.wraps_midnight() {
            t >= self.start || t < self.end
        } else {
            t >= self.start && t < self.end
        }
    }

    pub fn is_quiet(&self, timestamp: i64, tz: &Tz) -> bool {
        to_local(timestamp, tz)
            .map(|local| self.contains(local.time()))
            .unwrap_or(false)
    }

    /// Moves a timestamp inside the window forward to the end of that window.
    /// Timestamps outside the window are returned unchanged. The result is never
    /// earlier than the input and never more than one day later.
    pub fn shift_out(&self, timestamp: i64, tz: &Tz) -> Result<i64, SchedulingError> {
        let local = to_local(timestamp, tz).ok_or(SchedulingError::InvalidLocalTime(timestamp))?;
        if !self.contains(local.time()) {
            return Ok(timestamp);
        }

        let date = local.date_naive();
        let end_date = if self.wraps_midnight() && Time::from(local.time()) >= self.start {
            date + Duration::days(1)
        } else {
            date
        };
        let (end_date, end_time) = match self.end.to_naive() {
            Some(end_time) => (end_date, end_time),
            // 24:00
            None => (
                end_date + Duration::days(1),
                NaiveTime::from_hms_opt(0, 0, 0).ok_or(SchedulingError::InvalidLocalTime(timestamp))?,
            ),
        };

        let shifted = local_to_timestamp(&end_date.and_time(end_time), tz)
            .ok_or(SchedulingError::InvalidLocalTime(timestamp))?;
        if shifted < timestamp || shifted - timestamp > DAY_MILLIS || self.is_quiet(shifted, tz) {
            return Err(SchedulingError::ShiftExceedsBound(timestamp));
        }
        Ok(shifted)
    }
}
