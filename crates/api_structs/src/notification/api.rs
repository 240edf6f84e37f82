use salon_scheduler_domain::{conversion_stats::ConversionStatsRow, ID};
use serde::{Deserialize, Serialize};

pub mod get_conversion_stats {
    use super::*;

    #[derive(Deserialize, Debug)]
    pub struct PathParams {
        pub tenant_id: ID,
    }

    #[derive(Deserialize, Serialize, Debug, Clone)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub channel: String,
        #[serde(rename = "type")]
        pub notification_type: String,
        #[serde(default)]
        pub from_ts: Option<i64>,
        #[serde(default)]
        pub to_ts: Option<i64>,
    }

    #[derive(Deserialize, Serialize, Debug, Clone)]
    #[serde(rename_all = "camelCase")]
    pub struct ConversionStatsDTO {
        pub template_id: Option<ID>,
        pub variant_key: String,
        pub sent_count: usize,
        pub failed_count: usize,
        pub unique_clients: usize,
        pub unique_appointments: usize,
        pub completed_count: usize,
        pub cancelled_count: usize,
        pub no_show_count: usize,
        pub completion_rate: f64,
        pub no_show_rate: f64,
    }

    impl ConversionStatsDTO {
        pub fn new(row: ConversionStatsRow) -> Self {
            Self {
                template_id: row.template_id,
                variant_key: row.variant_key,
                sent_count: row.sent_count,
                failed_count: row.failed_count,
                unique_clients: row.unique_clients,
                unique_appointments: row.unique_appointments,
                completed_count: row.completed_count,
                cancelled_count: row.cancelled_count,
                no_show_count: row.no_show_count,
                completion_rate: row.completion_rate,
                no_show_rate: row.no_show_rate,
            }
        }
    }

    #[derive(Deserialize, Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub from_ts: i64,
        pub to_ts: i64,
        pub stats: Vec<ConversionStatsDTO>,
    }

    impl APIResponse {
        pub fn new(from_ts: i64, to_ts: i64, rows: Vec<ConversionStatsRow>) -> Self {
            Self {
                from_ts,
                to_ts,
                stats: rows.into_iter().map(ConversionStatsDTO::new).collect(),
            }
        }
    }
}
