use crate::shared::time::Time;
use chrono::prelude::*;
use chrono::Duration;
use chrono_tz::Tz;
use std::str::FromStr;

pub const MINUTE_MILLIS: i64 = 1000 * 60;
pub const HOUR_MILLIS: i64 = 60 * MINUTE_MILLIS;
pub const DAY_MILLIS: i64 = 24 * HOUR_MILLIS;

pub fn is_valid_date(datestr: &str) -> anyhow::Result<(i32, u32, u32)> {
    let dates = datestr.split('-').collect::<Vec<_>>();
    if dates.len() != 3 {
        return Err(anyhow::Error::msg(datestr.to_string()));
    }

    let (year, month, day) = match (
        dates[0].parse::<i32>(),
        dates[1].parse::<u32>(),
        dates[2].parse::<u32>(),
    ) {
        (Ok(year), Ok(month), Ok(day)) => (year, month, day),
        _ => return Err(anyhow::Error::msg(datestr.to_string())),
    };

    if !(1970..=2100).contains(&year) || !(1..=12).contains(&month) {
        return Err(anyhow::Error::msg(datestr.to_string()));
    }

    if day < 1 || day > get_month_length(year, month) {
        return Err(anyhow::Error::msg(datestr.to_string()));
    }

    Ok((year, month, day))
}

pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 100 != 0 && year % 4 == 0)
}

// month: January -> 1
pub fn get_month_length(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// A calendar day in some tenant's local timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Day {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl FromStr for Day {
    type Err = anyhow::Error;

    fn from_str(datestr: &str) -> Result<Self, Self::Err> {
        let (year, month, day) = is_valid_date(datestr)?;
        Ok(Self { year, month, day })
    }
}

impl Day {
    pub fn naive(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    pub fn weekday(&self) -> Option<Weekday> {
        self.naive().map(|d| d.weekday())
    }

    /// Resolves a wall clock time on this day to a timestamp. `24:00` means the
    /// start of the following day. Times skipped by a DST transition resolve to
    /// the first valid instant after them.
    pub fn at(&self, time: &Time, tz: &Tz) -> Option<i64> {
        let date = self.naive()?;
        let (date, time) = if time.hours == 24 {
            (date.succ_opt()?, NaiveTime::from_hms_opt(0, 0, 0)?)
        } else {
            (date, time.to_naive()?)
        };
        local_to_timestamp(&date.and_time(time), tz)
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.year, self.month, self.day)
    }
}

pub fn local_to_timestamp(local: &NaiveDateTime, tz: &Tz) -> Option<i64> {
    if let Some(dt) = tz.from_local_datetime(local).earliest() {
        return Some(dt.timestamp_millis());
    }
    // Inside a DST gap: walk forward until the wall clock exists again
    (1..=4)
        .map(|i| *local + Duration::minutes(30 * i))
        .find_map(|candidate| tz.from_local_datetime(&candidate).earliest())
        .map(|dt| dt.timestamp_millis())
}

pub fn to_local(timestamp: i64, tz: &Tz) -> Option<DateTime<Tz>> {
    tz.timestamp_millis_opt(timestamp).single()
}

pub fn format_date(date: &DateTime<Tz>) -> String {
    format!("{}-{}-{}", date.year(), date.month(), date.day())
}
