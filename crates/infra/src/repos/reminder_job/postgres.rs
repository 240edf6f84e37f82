use super::IReminderJobRepo;
use salon_scheduler_domain::{ReminderJob, ReminderJobStatus, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::{TryFrom, TryInto};
use tracing::error;

pub struct PostgresReminderJobRepo {
    pool: PgPool,
}

impl PostgresReminderJobRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderJobRaw {
    job_uid: Uuid,
    tenant_uid: Uuid,
    appointment_uid: Uuid,
    kind: String,
    fire_at: i64,
    dedupe_key: String,
    status: String,
    created: i64,
}

impl TryFrom<ReminderJobRaw> for ReminderJob {
    type Error = anyhow::Error;

    fn try_from(e: ReminderJobRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: e.job_uid.into(),
            tenant_id: e.tenant_uid.into(),
            appointment_id: e.appointment_uid.into(),
            kind: e.kind,
            fire_at: e.fire_at,
            dedupe_key: e.dedupe_key,
            status: e.status.parse()?,
            created: e.created,
        })
    }
}

fn into_jobs(raws: Vec<ReminderJobRaw>) -> anyhow::Result<Vec<ReminderJob>> {
    raws.into_iter().map(|j| j.try_into()).collect()
}

#[async_trait::async_trait]
impl IReminderJobRepo for PostgresReminderJobRepo {
    async fn insert_many(&self, jobs: &[ReminderJob]) -> anyhow::Result<Vec<ReminderJob>> {
        let mut inserted = Vec::new();
        for job in jobs {
            let res = sqlx::query(
                r#"
                INSERT INTO reminder_jobs
                (job_uid, tenant_uid, appointment_uid, kind, fire_at, dedupe_key, status, created)
                VALUES($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (dedupe_key) WHERE status <> 'cancelled' DO NOTHING
                "#,
            )
            .bind(job.id.inner_ref())
            .bind(job.tenant_id.inner_ref())
            .bind(job.appointment_id.inner_ref())
            .bind(&job.kind)
            .bind(job.fire_at)
            .bind(&job.dedupe_key)
            .bind(job.status.as_str())
            .bind(job.created)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Unable to insert reminder job: {:?}. DB returned error: {:?}", job, e);
                e
            })?;
            if res.rows_affected() == 1 {
                inserted.push(job.clone());
            }
        }
        Ok(inserted)
    }

    async fn find_by_appointment(&self, appointment_id: &ID) -> anyhow::Result<Vec<ReminderJob>> {
        let raws: Vec<ReminderJobRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminder_jobs AS j
            WHERE j.appointment_uid = $1
            ORDER BY j.fire_at
            "#,
        )
        .bind(appointment_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        into_jobs(raws)
    }

    async fn delete_by_appointment(&self, appointment_id: &ID) -> anyhow::Result<usize> {
        let res = sqlx::query(
            r#"
            DELETE FROM reminder_jobs AS j
            WHERE j.appointment_uid = $1
            "#,
        )
        .bind(appointment_id.inner_ref())
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() as usize)
    }

    async fn take_due(&self, before: i64) -> anyhow::Result<Vec<ReminderJob>> {
        // SKIP LOCKED lets several server instances poll at the same time
        let raws: Vec<ReminderJobRaw> = sqlx::query_as(
            r#"
            UPDATE reminder_jobs
            SET status = 'fired'
            WHERE job_uid IN (
                SELECT j.job_uid FROM reminder_jobs AS j
                WHERE j.status = 'pending' AND j.fire_at <= $1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING *
            "#,
        )
        .bind(before)
        .fetch_all(&self.pool)
        .await?;

        into_jobs(raws)
    }

    async fn update_status(&self, job_id: &ID, status: ReminderJobStatus) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminder_jobs
            SET status = $2
            WHERE job_uid = $1
            "#,
        )
        .bind(job_id.inner_ref())
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
