use crate::{
    appointment::Appointment,
    conflict::{busy_intervals, is_free, BusyInterval},
    date::{Day, MINUTE_MILLIS},
    resource::Resource,
    service::Service,
    shared::entity::ID,
    tenant::TenantSettings,
};
use serde::Serialize;

#[derive(Serialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BookingSlot {
    pub start: i64,
    pub end: i64,
}

/// A free slot of a specific `Resource`
#[derive(PartialEq, Debug, Clone)]
pub struct ResourceBookingSlot {
    pub start: i64,
    pub end: i64,
    pub resource_id: ID,
}

/// All values in millis
#[derive(Debug, Clone)]
pub struct BookingSlotsOptions {
    pub start_ts: i64,
    pub end_ts: i64,
    pub duration: i64,
    pub interval: i64,
    /// Kept free before every busy interval
    pub buffer_before: i64,
    /// Kept free after every busy interval
    pub buffer_after: i64,
    /// Slots starting before this are dropped
    pub not_before: Option<i64>,
}

/// Walks a cursor through the working window `[start_ts, end_ts)` and
/// collects every slot of the given duration that is clear of the
/// (buffer inflated) busy intervals.
pub fn get_booking_slots(busy: &[BusyInterval], options: &BookingSlotsOptions) -> Vec<BookingSlot> {
    let mut booking_slots = Vec::new();
    let &BookingSlotsOptions {
        start_ts,
        end_ts,
        duration,
        interval,
        buffer_before,
        buffer_after,
        not_before,
    } = options;

    if duration < MINUTE_MILLIS || interval < MINUTE_MILLIS {
        return booking_slots;
    }

    let busy = busy
        .iter()
        .map(|b| b.inflate(buffer_before, buffer_after))
        .collect::<Vec<_>>();

    let mut cursor = start_ts;
    while cursor + duration <= end_ts {
        let in_past = not_before.map(|ts| cursor < ts).unwrap_or(false);
        if !in_past && is_free(cursor, cursor + duration, &busy) {
            booking_slots.push(BookingSlot {
                start: cursor,
                end: cursor + duration,
            });
        }

        cursor += interval;
    }

    booking_slots
}

/// Free slots of one resource on one local day, over all of its working
/// windows on that day
pub fn get_resource_booking_slots(
    resource: &Resource,
    service: &Service,
    settings: &TenantSettings,
    day: &Day,
    appointments: &[Appointment],
    now: i64,
) -> Vec<ResourceBookingSlot> {
    let busy = busy_intervals(appointments, None);
    let (buffer_before, buffer_after) = service.buffers(settings.buffer_minutes);
    let step = settings
        .slot_step_minutes
        .unwrap_or(service.duration_minutes);

    resource
        .working_windows(day, &settings.timezone)
        .into_iter()
        .flat_map(|(start_ts, end_ts)| {
            let options = BookingSlotsOptions {
                start_ts,
                end_ts,
                duration: service.duration_minutes * MINUTE_MILLIS,
                interval: step * MINUTE_MILLIS,
                buffer_before: buffer_before * MINUTE_MILLIS,
                buffer_after: buffer_after * MINUTE_MILLIS,
                not_before: Some(now),
            };
            get_booking_slots(&busy, &options)
        })
        .map(|slot| ResourceBookingSlot {
            start: slot.start,
            end: slot.end,
            resource_id: resource.id.clone(),
        })
        .collect()
}
