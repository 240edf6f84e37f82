use crate::{
    booking_slots::ResourceBookingSlot,
    date::{format_date, to_local, MINUTE_MILLIS},
    tenant::OffpeakWindow,
};
use chrono::Timelike;
use chrono_tz::Tz;
use std::collections::HashMap;

const PACKING_WEIGHT: f64 = 0.5;
const OFFPEAK_WEIGHT: f64 = 0.2;
const PROXIMITY_WEIGHT: f64 = 0.3;
/// Gap assumed for a slot that has no other slot on the same day
const LONELY_GAP_MINUTES: f64 = 180.0;
const PROXIMITY_HORIZON_MINUTES: f64 = 120.0;

#[derive(Debug, Clone)]
pub struct SlotScoringOptions {
    pub preferred_ts: i64,
    pub timezone: Tz,
    pub grid_minutes: i64,
    pub offpeak: OffpeakWindow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSlot {
    pub slot: ResourceBookingSlot,
    pub score: f64,
    pub reason: String,
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

pub fn is_aligned_to_grid(ts: i64, tz: &Tz, grid_minutes: i64) -> bool {
    if grid_minutes <= 1 {
        return true;
    }
    match to_local(ts, tz) {
        Some(local) => local.second() == 0 && local.minute() as i64 % grid_minutes == 0,
        None => false,
    }
}

fn local_date_key(ts: i64, tz: &Tz) -> String {
    to_local(ts, tz)
        .map(|local| format_date(&local))
        .unwrap_or_default()
}

/// Scores every slot in input order. Packing compares a slot with the other
/// slots on the same local date.
pub fn score_slots(slots: &[ResourceBookingSlot], options: &SlotScoringOptions) -> Vec<ScoredSlot> {
    let tz = &options.timezone;
    let grid = options.grid_minutes.max(1) as f64;

    let mut starts_by_date: HashMap<String, Vec<i64>> = HashMap::new();
    for slot in slots {
        starts_by_date
            .entry(local_date_key(slot.start, tz))
            .or_default()
            .push(slot.start);
    }

    slots
        .iter()
        .map(|slot| {
            let gap_minutes = starts_by_date
                .get(&local_date_key(slot.start, tz))
                .into_iter()
                .flatten()
                .filter(|other| **other != slot.start)
                .map(|other| (other - slot.start).abs() as f64 / MINUTE_MILLIS as f64)
                .fold(LONELY_GAP_MINUTES, f64::min);
            let packing = clamp((2.0 * grid - gap_minutes) / (2.0 * grid), 0.0, PACKING_WEIGHT);

            let hour = to_local(slot.start, tz).map(|l| l.hour()).unwrap_or(0);
            let offpeak = if hour < options.offpeak.morning_end_hour
                || hour >= options.offpeak.evening_start_hour
            {
                OFFPEAK_WEIGHT
            } else {
                0.0
            };

            let distance_minutes =
                (slot.start - options.preferred_ts).abs() as f64 / MINUTE_MILLIS as f64;
            let proximity =
                clamp(1.0 - distance_minutes / PROXIMITY_HORIZON_MINUTES, 0.0, 1.0) * PROXIMITY_WEIGHT;

            let mut reasons = Vec::new();
            if offpeak > 0.0 {
                reasons.push("offpeak");
            }
            if packing > 0.1 {
                reasons.push("packed");
            }
            if proximity > 0.1 {
                reasons.push("near");
            }
            let reason = if reasons.is_empty() {
                "ok".to_string()
            } else {
                reasons.join("+")
            };

            ScoredSlot {
                slot: slot.clone(),
                score: clamp(packing + offpeak + proximity, 0.0, 1.0),
                reason,
            }
        })
        .collect()
}

/// Drops slots off the grid, scores the rest and returns the best `limit`
/// of them. Ties go to the slot closest to the preferred time.
pub fn rank_slots(
    slots: &[ResourceBookingSlot],
    options: &SlotScoringOptions,
    limit: usize,
) -> Vec<ScoredSlot> {
    let aligned = slots
        .iter()
        .filter(|s| is_aligned_to_grid(s.start, &options.timezone, options.grid_minutes))
        .cloned()
        .collect::<Vec<_>>();

    let mut scored = score_slots(&aligned, options);
    scored.sort_by(|a, b| {
        b.score.total_cmp(&a.score).then_with(|| {
            let distance_a = (a.slot.start - options.preferred_ts).abs();
            let distance_b = (b.slot.start - options.preferred_ts).abs();
            distance_a.cmp(&distance_b)
        })
    });
    scored.truncate(limit.max(1));
    scored
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::entity::ID;
    use chrono::prelude::*;

    fn at(h: u32, m: u32) -> i64 {
        chrono_tz::UTC
            .with_ymd_and_hms(2024, 5, 10, h, m, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn slot(start: i64) -> ResourceBookingSlot {
        ResourceBookingSlot {
            start,
            end: start + 60 * MINUTE_MILLIS,
            resource_id: ID::default(),
        }
    }

    fn options(preferred_ts: i64) -> SlotScoringOptions {
        SlotScoringOptions {
            preferred_ts,
            timezone: chrono_tz::UTC,
            grid_minutes: 30,
            offpeak: Default::default(),
        }
    }

    #[test]
    fn it_checks_grid_alignment() {
        let tz = chrono_tz::UTC;
        assert!(is_aligned_to_grid(at(10, 30), &tz, 15));
        assert!(is_aligned_to_grid(at(10, 45), &tz, 15));
        assert!(!is_aligned_to_grid(at(10, 40), &tz, 15));
        assert!(is_aligned_to_grid(at(10, 40), &tz, 1));
        assert!(is_aligned_to_grid(at(10, 40), &tz, 0));
    }

    #[test]
    fn lonely_midday_slot_far_from_preference_is_ok() {
        let scored = score_slots(&[slot(at(14, 0))], &options(at(9, 0)));
        assert_eq!(scored[0].score, 0.0);
        assert_eq!(scored[0].reason, "ok");
    }

    #[test]
    fn it_combines_reasons() {
        let slots = vec![slot(at(9, 0)), slot(at(9, 30))];
        let scored = score_slots(&slots, &options(at(9, 0)));

        // Offpeak, 30 minutes to a neighbour with grid 30, exactly on the preferred time
        assert_eq!(scored[0].reason, "offpeak+packed+near");
        assert!((scored[0].score - 1.0).abs() < 1e-9);

        // proximity = (1 - 30/120) * 0.3 = 0.225
        assert_eq!(scored[1].reason, "offpeak+packed+near");
        assert!((scored[1].score - 0.925).abs() < 1e-9);
    }

    #[test]
    fn it_only_counts_slots_on_the_same_local_day_as_neighbours() {
        let next_day = at(12, 0) + 24 * 60 * MINUTE_MILLIS;
        let scored = score_slots(&[slot(at(12, 0)), slot(next_day)], &options(at(0, 0)));
        assert!(scored.iter().all(|s| s.reason == "ok"));
    }

    #[test]
    fn scores_stay_within_bounds() {
        let slots = (0..48).map(|i| slot(at(0, 0) + i * 30 * MINUTE_MILLIS)).collect::<Vec<_>>();
        for scored in score_slots(&slots, &options(at(12, 0))) {
            assert!(scored.score >= 0.0 && scored.score <= 1.0);
        }
    }

    #[test]
    fn it_ranks_and_breaks_ties_by_distance() {
        let preferred = at(13, 0);
        let slots = vec![
            slot(at(12, 10)), // off grid
            slot(at(16, 0)),
            slot(at(10, 0)),
            slot(at(13, 0)),
        ];
        let ranked = rank_slots(&slots, &options(preferred), 10);
        let starts = ranked.iter().map(|s| s.slot.start).collect::<Vec<_>>();
        // 13:00 is preferred, 10:00 is offpeak, 16:00 has nothing
        assert_eq!(starts, vec![at(13, 0), at(10, 0), at(16, 0)]);

        let ranked = rank_slots(&slots, &options(preferred), 0);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn equal_scores_are_ordered_by_distance() {
        // Both are lonely, midday and far away from the preferred time
        let slots = vec![slot(at(16, 0)), slot(at(13, 0))];
        let ranked = rank_slots(&slots, &options(at(9, 0)), 10);
        assert_eq!(ranked[0].slot.start, at(13, 0));
        assert_eq!(ranked[0].score, ranked[1].score);
    }
}
