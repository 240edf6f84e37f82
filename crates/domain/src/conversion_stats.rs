use crate::{
    appointment::{Appointment, AppointmentStatus},
    notification::{NotificationLog, NotificationStatus},
    shared::entity::ID,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Delivery and outcome numbers of one template variant
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionStatsRow {
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

#[derive(Default)]
struct VariantLogs {
    sent_count: usize,
    failed_count: usize,
    appointment_ids: HashSet<ID>,
    client_ids: HashSet<ID>,
}

/// Appointments referenced by the logs, which the caller has to look up
pub fn referenced_appointment_ids(logs: &[NotificationLog]) -> Vec<ID> {
    let mut ids = logs
        .iter()
        .filter_map(|log| log.appointment_id.clone())
        .collect::<Vec<_>>();
    ids.sort();
    ids.dedup();
    ids
}

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Groups the logs by (template, variant) and joins them with the current
/// status of the appointments they were sent for.
///
/// `logs` must already be restricted to one tenant, channel, type and time
/// range. `appointments` are the referenced appointments that still exist.
pub fn aggregate_conversion_stats(
    logs: &[NotificationLog],
    appointments: &[Appointment],
) -> Vec<ConversionStatsRow> {
    let mut by_variant: BTreeMap<(String, Option<ID>), VariantLogs> = BTreeMap::new();
    for log in logs {
        let stats = by_variant
            .entry((log.variant_key.clone(), log.template_id.clone()))
            .or_default();
        match log.status {
            NotificationStatus::Sent => stats.sent_count += 1,
            NotificationStatus::Failed => stats.failed_count += 1,
        }
        if let Some(appointment_id) = &log.appointment_id {
            stats.appointment_ids.insert(appointment_id.clone());
        }
        stats.client_ids.insert(log.client_id.clone());
    }

    let appointments = appointments
        .iter()
        .map(|a| (&a.id, a))
        .collect::<HashMap<_, _>>();

    by_variant
        .into_iter()
        .map(|((variant_key, template_id), stats)| {
            let found = stats
                .appointment_ids
                .iter()
                .filter_map(|id| appointments.get(id))
                .collect::<Vec<_>>();
            let count = |status: AppointmentStatus| found.iter().filter(|a| a.status == status).count();
            let unique_appointments = found.len();
            let completed_count = count(AppointmentStatus::Completed);
            let no_show_count = count(AppointmentStatus::NoShow);
            let appointment_clients = found.iter().map(|a| &a.client_id).collect::<HashSet<_>>();

            ConversionStatsRow {
                template_id,
                variant_key,
                sent_count: stats.sent_count,
                failed_count: stats.failed_count,
                unique_clients: stats.client_ids.len().max(appointment_clients.len()),
                unique_appointments,
                completed_count,
                cancelled_count: count(AppointmentStatus::Cancelled),
                no_show_count,
                completion_rate: rate(completed_count, unique_appointments),
                no_show_rate: rate(no_show_count, unique_appointments),
            }
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn log(
        template_id: &Option<ID>,
        variant_key: &str,
        status: NotificationStatus,
        client_id: &ID,
        appointment_id: Option<&ID>,
    ) -> NotificationLog {
        NotificationLog {
            id: Default::default(),
            tenant_id: Default::default(),
            template_id: template_id.clone(),
            variant_key: variant_key.into(),
            channel: "telegram".into(),
            notification_type: "reminder_24h".into(),
            status,
            client_id: client_id.clone(),
            appointment_id: appointment_id.cloned(),
            text: String::new(),
            error: None,
            created: 0,
        }
    }

    fn appointment(client_id: &ID, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: Default::default(),
            tenant_id: Default::default(),
            resource_id: Default::default(),
            service_id: Default::default(),
            client_id: client_id.clone(),
            start_ts: 0,
            end_ts: 1,
            status,
            created: 0,
            updated: 0,
        }
    }

    #[test]
    fn it_aggregates_per_variant() {
        let template_a = Some(ID::default());
        let template_b = Some(ID::default());
        let (c1, c2, c3) = (ID::default(), ID::default(), ID::default());
        let a1 = appointment(&c1, AppointmentStatus::Completed);
        let a2 = appointment(&c2, AppointmentStatus::NoShow);
        let a3 = appointment(&c3, AppointmentStatus::Cancelled);
        let deleted = ID::default();

        let logs = vec![
            // 24h and 1h reminder of the same appointment
            log(&template_a, "A", NotificationStatus::Sent, &c1, Some(&a1.id)),
            log(&template_a, "A", NotificationStatus::Sent, &c1, Some(&a1.id)),
            log(&template_a, "A", NotificationStatus::Failed, &c2, Some(&a2.id)),
            log(&template_b, "B", NotificationStatus::Sent, &c3, Some(&a3.id)),
            log(&template_b, "B", NotificationStatus::Sent, &c3, Some(&deleted)),
        ];
        let appointments = vec![a1, a2, a3];

        let rows = aggregate_conversion_stats(&logs, &appointments);
        assert_eq!(rows.len(), 2);

        let a = &rows[0];
        assert_eq!(a.variant_key, "A");
        assert_eq!(a.template_id, template_a);
        assert_eq!((a.sent_count, a.failed_count), (2, 1));
        assert_eq!(a.unique_clients, 2);
        assert_eq!(a.unique_appointments, 2);
        assert_eq!((a.completed_count, a.cancelled_count, a.no_show_count), (1, 0, 1));
        assert_eq!(a.completion_rate, 0.5);
        assert_eq!(a.no_show_rate, 0.5);

        let b = &rows[1];
        assert_eq!(b.variant_key, "B");
        assert_eq!(b.unique_appointments, 1);
        assert_eq!(b.cancelled_count, 1);
        assert_eq!(b.completion_rate, 0.0);
    }

    #[test]
    fn rates_are_zero_without_appointments() {
        let client = ID::default();
        let logs = vec![log(&None, "A", NotificationStatus::Sent, &client, None)];
        let rows = aggregate_conversion_stats(&logs, &[]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].template_id, None);
        assert_eq!(rows[0].unique_appointments, 0);
        assert_eq!(rows[0].completion_rate, 0.0);
        assert_eq!(rows[0].no_show_rate, 0.0);
        assert_eq!(rows[0].unique_clients, 1);
    }

    #[test]
    fn rows_respect_rate_and_count_bounds() {
        let statuses = [
            AppointmentStatus::Scheduled,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::NoShow,
        ];
        let mut logs = Vec::new();
        let mut appointments = Vec::new();
        for i in 0..40 {
            let client = ID::default();
            let a = appointment(&client, statuses[i % statuses.len()]);
            let variant = if i % 3 == 0 { "A" } else { "B" };
            logs.push(log(&None, variant, NotificationStatus::Sent, &client, Some(&a.id)));
            appointments.push(a);
        }

        for row in aggregate_conversion_stats(&logs, &appointments) {
            assert!((0.0..=1.0).contains(&row.completion_rate));
            assert!((0.0..=1.0).contains(&row.no_show_rate));
            assert!(row.completed_count + row.cancelled_count + row.no_show_count <= row.unique_appointments);
        }
    }

    #[test]
    fn it_lists_referenced_appointments_once() {
        let client = ID::default();
        let appointment_id = ID::default();
        let logs = vec![
            log(&None, "A", NotificationStatus::Sent, &client, Some(&appointment_id)),
            log(&None, "B", NotificationStatus::Failed, &client, Some(&appointment_id)),
            log(&None, "B", NotificationStatus::Failed, &client, None),
        ];
        assert_eq!(referenced_appointment_ids(&logs), vec![appointment_id]);
    }
}
