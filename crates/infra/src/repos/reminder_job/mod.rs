mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderJobRepo;
pub use postgres::PostgresReminderJobRepo;
use salon_scheduler_domain::{ReminderJob, ReminderJobStatus, ID};

#[async_trait::async_trait]
pub trait IReminderJobRepo: Send + Sync {
    /// Inserts the jobs whose dedupe key is not already taken by a live job
    /// and returns the inserted ones
    async fn insert_many(&self, jobs: &[ReminderJob]) -> anyhow::Result<Vec<ReminderJob>>;
    async fn find_by_appointment(&self, appointment_id: &ID) -> anyhow::Result<Vec<ReminderJob>>;
    /// Returns the number of deleted jobs
    async fn delete_by_appointment(&self, appointment_id: &ID) -> anyhow::Result<usize>;
    /// Marks pending jobs with `fire_at <= before` as fired and returns them.
    /// A job is only ever handed out once.
    async fn take_due(&self, before: i64) -> anyhow::Result<Vec<ReminderJob>>;
    async fn update_status(&self, job_id: &ID, status: ReminderJobStatus) -> anyhow::Result<()>;
}
