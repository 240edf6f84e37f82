mod inmemory;
mod postgres;

pub use inmemory::InMemoryAppointmentRepo;
pub use postgres::PostgresAppointmentRepo;
use salon_scheduler_domain::{Appointment, AppointmentStatus, ID};

/// Outcome of a write that has to keep the appointments of a resource
/// free of overlaps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentWrite {
    Written,
    /// An active appointment of the resource overlaps the interval
    Conflict,
    /// The stored status is no longer the status the change was based on
    Stale,
}

#[async_trait::async_trait]
pub trait IAppointmentRepo: Send + Sync {
    /// Inserts the appointment unless an active appointment of the same
    /// resource overlaps it. The check and the insert are atomic per resource.
    async fn insert_if_free(&self, appointment: &Appointment) -> anyhow::Result<AppointmentWrite>;
    /// Saves `cancelled` and inserts `replacement` in one step. The replacement
    /// is checked for overlaps while ignoring the appointment it replaces.
    /// Nothing is written unless the stored status is still `previous_status`.
    async fn reschedule(
        &self,
        cancelled: &Appointment,
        previous_status: AppointmentStatus,
        replacement: &Appointment,
    ) -> anyhow::Result<AppointmentWrite>;
    /// Only for status changes. The interval of an appointment never changes here.
    /// Writes only when the stored status is still `previous_status`.
    async fn save(
        &self,
        appointment: &Appointment,
        previous_status: AppointmentStatus,
    ) -> anyhow::Result<AppointmentWrite>;
    async fn find(&self, appointment_id: &ID) -> anyhow::Result<Option<Appointment>>;
    async fn find_many(&self, tenant_id: &ID, appointment_ids: &[ID]) -> anyhow::Result<Vec<Appointment>>;
    /// Appointments of the resource, of any status, overlapping `[start_ts, end_ts)`
    /// ordered by start
    async fn find_by_resource(
        &self,
        resource_id: &ID,
        start_ts: i64,
        end_ts: i64,
    ) -> anyhow::Result<Vec<Appointment>>;
}
