use salon_scheduler_domain::{slot_scoring::ScoredSlot, Tz, ID};
use serde::{Deserialize, Serialize};

pub mod get_available_slots {
    use super::*;

    #[derive(Deserialize, Debug)]
    pub struct PathParams {
        pub tenant_id: ID,
        pub service_id: ID,
    }

    #[derive(Deserialize, Serialize, Debug, Clone)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        /// Local date of the tenant, e.g. 2024-5-10
        pub date: String,
        #[serde(default)]
        pub resource_id: Option<ID>,
        #[serde(default)]
        pub preferred_ts: Option<i64>,
    }

    #[derive(Deserialize, Serialize, Debug, Clone)]
    #[serde(rename_all = "camelCase")]
    pub struct SlotDTO {
        pub start: i64,
        pub end: i64,
        pub resource_id: ID,
        pub score: f64,
        pub reason: String,
    }

    impl SlotDTO {
        pub fn new(slot: ScoredSlot) -> Self {
            Self {
                start: slot.slot.start,
                end: slot.slot.end,
                resource_id: slot.slot.resource_id,
                score: slot.score,
                reason: slot.reason,
            }
        }
    }

    #[derive(Deserialize, Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub date: String,
        pub timezone: Tz,
        pub slots: Vec<SlotDTO>,
    }

    impl APIResponse {
        pub fn new(date: String, timezone: Tz, slots: Vec<ScoredSlot>) -> Self {
            Self {
                date,
                timezone,
                slots: slots.into_iter().map(SlotDTO::new).collect(),
            }
        }
    }
}
