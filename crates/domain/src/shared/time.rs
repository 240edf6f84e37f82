use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Wall clock time of day in a tenant's local timezone
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time {
    pub hours: u32,
    pub minutes: u32,
}

impl Time {
    pub fn new(hours: u32, minutes: u32) -> Self {
        Self { hours, minutes }
    }

    /// `24:00` is allowed so that an interval can run until midnight
    pub fn is_valid(&self) -> bool {
        (self.hours < 24 && self.minutes < 60) || (self.hours == 24 && self.minutes == 0)
    }

    pub fn minutes_of_day(&self) -> i64 {
        (self.hours * 60 + self.minutes) as i64
    }

    pub fn to_naive(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hours, self.minutes, 0)
    }
}

impl From<NaiveTime> for Time {
    fn from(t: NaiveTime) -> Self {
        use chrono::Timelike;
        Self {
            hours: t.hour(),
            minutes: t.minute(),
        }
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_orders_times() {
        assert!(Time::new(9, 30) < Time::new(10, 0));
        assert!(Time::new(10, 15) > Time::new(10, 0));
        assert_eq!(Time::new(8, 5).to_string(), "08:05");
    }

    #[test]
    fn it_validates_times() {
        assert!(Time::new(0, 0).is_valid());
        assert!(Time::new(24, 0).is_valid());
        assert!(!Time::new(24, 1).is_valid());
        assert!(!Time::new(12, 60).is_valid());
        assert_eq!(Time::new(24, 0).to_naive(), None);
    }
}
