use crate::{
    date::Day,
    shared::{
        entity::{Entity, ID},
        time::Time,
    },
};
use chrono::Weekday;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A bookable staff member of a `Tenant`
#[derive(Debug, Clone)]
pub struct Resource {
    pub id: ID,
    pub tenant_id: ID,
    pub name: String,
    pub working_hours: Vec<WorkingHours>,
}

impl Resource {
    pub fn new(tenant_id: ID, name: &str, working_hours: Vec<WorkingHours>) -> Self {
        Self {
            id: Default::default(),
            tenant_id,
            name: name.into(),
            working_hours,
        }
    }

    /// Working windows on the given local day as `[start, end)` timestamps, ordered by start
    pub fn working_windows(&self, day: &Day, tz: &Tz) -> Vec<(i64, i64)> {
        let weekday = match day.weekday() {
            Some(weekday) => weekday,
            None => return Vec::new(),
        };
        let mut windows = self
            .working_hours
            .iter()
            .filter(|wh| wh.weekday == weekday && wh.is_valid())
            .filter_map(|wh| Some((day.at(&wh.start, tz)?, day.at(&wh.end, tz)?)))
            .filter(|(start, end)| start < end)
            .collect::<Vec<_>>();
        windows.sort_unstable();
        windows
    }
}

impl Entity for Resource {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// One working interval on a weekday. Several entries on the same weekday
/// express breaks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkingHours {
    pub weekday: Weekday,
    pub start: Time,
    pub end: Time,
}

impl WorkingHours {
    pub fn new(weekday: Weekday, start: Time, end: Time) -> Self {
        Self {
            weekday,
            start,
            end,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.start.is_valid() && self.end.is_valid() && self.start < self.end
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::prelude::*;

    #[test]
    fn it_computes_working_windows_for_day() {
        let tz = chrono_tz::UTC;
        let resource = Resource::new(
            ID::default(),
            "Anna",
            vec![
                WorkingHours::new(Weekday::Mon, Time::new(13, 0), Time::new(17, 0)),
                WorkingHours::new(Weekday::Mon, Time::new(9, 0), Time::new(12, 0)),
                WorkingHours::new(Weekday::Tue, Time::new(9, 0), Time::new(17, 0)),
                // Invalid and ignored
                WorkingHours::new(Weekday::Mon, Time::new(18, 0), Time::new(17, 0)),
            ],
        );
        let monday = "2024-3-4".parse::<Day>().unwrap();
        let windows = resource.working_windows(&monday, &tz);
        let at = |h: u32| Utc.with_ymd_and_hms(2024, 3, 4, h, 0, 0).unwrap().timestamp_millis();
        assert_eq!(windows, vec![(at(9), at(12)), (at(13), at(17))]);

        let sunday = "2024-3-3".parse::<Day>().unwrap();
        assert!(resource.working_windows(&sunday, &tz).is_empty());
    }
}
