use super::IReminderJobRepo;
use crate::repos::shared::inmemory_repo::*;
use salon_scheduler_domain::{ReminderJob, ReminderJobStatus, ID};
use std::sync::Mutex;

pub struct InMemoryReminderJobRepo {
    jobs: Mutex<Vec<ReminderJob>>,
}

impl InMemoryReminderJobRepo {
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IReminderJobRepo for InMemoryReminderJobRepo {
    async fn insert_many(&self, jobs: &[ReminderJob]) -> anyhow::Result<Vec<ReminderJob>> {
        let mut stored = self.jobs.lock().unwrap();
        let mut inserted = Vec::new();
        for job in jobs {
            let taken = stored.iter().any(|j| {
                j.dedupe_key == job.dedupe_key && j.status != ReminderJobStatus::Cancelled
            });
            if !taken {
                stored.push(job.clone());
                inserted.push(job.clone());
            }
        }
        Ok(inserted)
    }

    async fn find_by_appointment(&self, appointment_id: &ID) -> anyhow::Result<Vec<ReminderJob>> {
        let mut jobs = find_by(&self.jobs, |j| j.appointment_id == *appointment_id);
        jobs.sort_by_key(|j| j.fire_at);
        Ok(jobs)
    }

    async fn delete_by_appointment(&self, appointment_id: &ID) -> anyhow::Result<usize> {
        Ok(delete_by(&self.jobs, |j| j.appointment_id == *appointment_id))
    }

    async fn take_due(&self, before: i64) -> anyhow::Result<Vec<ReminderJob>> {
        Ok(update_many(
            &self.jobs,
            |j| j.status == ReminderJobStatus::Pending && j.fire_at <= before,
            |j| j.status = ReminderJobStatus::Fired,
        ))
    }

    async fn update_status(&self, job_id: &ID, status: ReminderJobStatus) -> anyhow::Result<()> {
        update_many(&self.jobs, |j| j.id == *job_id, |j| j.status = status);
        Ok(())
    }
}
