use crate::date::MINUTE_MILLIS;
use crate::shared::entity::{Entity, ID};

/// Something a `Tenant` sells, performed by one of its `Resource`s
#[derive(Debug, Clone)]
pub struct Service {
    pub id: ID,
    pub tenant_id: ID,
    pub name: String,
    pub duration_minutes: i64,
    /// Overrides the tenant buffer before existing bookings when set
    pub buffer_before_minutes: Option<i64>,
    /// Overrides the tenant buffer after existing bookings when set
    pub buffer_after_minutes: Option<i64>,
}

impl Service {
    pub fn new(tenant_id: ID, name: &str, duration_minutes: i64) -> Self {
        Self {
            id: Default::default(),
            tenant_id,
            name: name.into(),
            duration_minutes,
            buffer_before_minutes: None,
            buffer_after_minutes: None,
        }
    }

    /// End of a booking starting at `start_ts`, `None` when it does not fit in a timestamp
    pub fn end_of(&self, start_ts: i64) -> Option<i64> {
        self.duration_minutes
            .checked_mul(MINUTE_MILLIS)
            .and_then(|duration| start_ts.checked_add(duration))
    }

    /// Minutes to keep free before and after each existing booking
    pub fn buffers(&self, tenant_buffer_minutes: i64) -> (i64, i64) {
        (
            self.buffer_before_minutes.unwrap_or(tenant_buffer_minutes).max(0),
            self.buffer_after_minutes.unwrap_or(tenant_buffer_minutes).max(0),
        )
    }
}

impl Entity for Service {
    fn id(&self) -> &ID {
        &self.id
    }
}
