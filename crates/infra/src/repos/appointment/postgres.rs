use super::{AppointmentWrite, IAppointmentRepo};
use salon_scheduler_domain::{Appointment, AppointmentStatus, ID};
use sqlx::{types::Uuid, FromRow, PgPool, Postgres, Transaction};
use std::convert::{TryFrom, TryInto};
use tracing::error;

pub struct PostgresAppointmentRepo {
    pool: PgPool,
}

impl PostgresAppointmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AppointmentRaw {
    appointment_uid: Uuid,
    tenant_uid: Uuid,
    resource_uid: Uuid,
    service_uid: Uuid,
    client_uid: Uuid,
    start_ts: i64,
    end_ts: i64,
    status: String,
    created: i64,
    updated: i64,
}

impl TryFrom<AppointmentRaw> for Appointment {
    type Error = anyhow::Error;

    fn try_from(e: AppointmentRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: e.appointment_uid.into(),
            tenant_id: e.tenant_uid.into(),
            resource_id: e.resource_uid.into(),
            service_id: e.service_uid.into(),
            client_id: e.client_uid.into(),
            start_ts: e.start_ts,
            end_ts: e.end_ts,
            status: e.status.parse()?,
            created: e.created,
            updated: e.updated,
        })
    }
}

fn into_appointments(raws: Vec<AppointmentRaw>) -> anyhow::Result<Vec<Appointment>> {
    raws.into_iter().map(|a| a.try_into()).collect()
}

/// The exclusion constraint on `appointments` is the last line of defense
/// against double bookings
fn is_exclusion_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23P01"),
        _ => false,
    }
}

/// Serializes writers of the same resource until the transaction ends
async fn lock_resource(tx: &mut Transaction<'_, Postgres>, resource_id: &ID) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        SELECT resource_uid FROM resources
        WHERE resource_uid = $1
        FOR UPDATE
        "#,
    )
    .bind(resource_id.inner_ref())
    .fetch_optional(&mut **tx)
    .await?;
    Ok(())
}

async fn overlaps_active(
    tx: &mut Transaction<'_, Postgres>,
    appointment: &Appointment,
    exclude: Option<&ID>,
) -> anyhow::Result<bool> {
    let overlapping: Option<(Uuid,)> = sqlx::query_as(
        r#"
        SELECT a.appointment_uid FROM appointments AS a
        WHERE a.resource_uid = $1 AND
        a.status IN ('scheduled', 'confirmed') AND
        a.start_ts < $3 AND
        a.end_ts > $2 AND
        ($4::uuid IS NULL OR a.appointment_uid <> $4)
        LIMIT 1
        "#,
    )
    .bind(appointment.resource_id.inner_ref())
    .bind(appointment.start_ts)
    .bind(appointment.end_ts)
    .bind(exclude.map(|id| *id.inner_ref()))
    .fetch_optional(&mut **tx)
    .await?;
    Ok(overlapping.is_some())
}

async fn insert_appointment(
    tx: &mut Transaction<'_, Postgres>,
    appointment: &Appointment,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO appointments
        (appointment_uid, tenant_uid, resource_uid, service_uid, client_uid, start_ts, end_ts, status, created, updated)
        VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(appointment.id.inner_ref())
    .bind(appointment.tenant_id.inner_ref())
    .bind(appointment.resource_id.inner_ref())
    .bind(appointment.service_id.inner_ref())
    .bind(appointment.client_id.inner_ref())
    .bind(appointment.start_ts)
    .bind(appointment.end_ts)
    .bind(appointment.status.as_str())
    .bind(appointment.created)
    .bind(appointment.updated)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Compare and set on the status, false when the stored status has moved on
async fn update_status<'e, E>(
    executor: E,
    appointment: &Appointment,
    previous_status: AppointmentStatus,
) -> Result<bool, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let res = sqlx::query(
        r#"
        UPDATE appointments
        SET status = $2, updated = $3
        WHERE appointment_uid = $1 AND status = $4
        "#,
    )
    .bind(appointment.id.inner_ref())
    .bind(appointment.status.as_str())
    .bind(appointment.updated)
    .bind(previous_status.as_str())
    .execute(executor)
    .await?;
    Ok(res.rows_affected() == 1)
}

#[async_trait::async_trait]
impl IAppointmentRepo for PostgresAppointmentRepo {
    async fn insert_if_free(&self, appointment: &Appointment) -> anyhow::Result<AppointmentWrite> {
        let mut tx = self.pool.begin().await?;
        lock_resource(&mut tx, &appointment.resource_id).await?;

        if appointment.is_active() && overlaps_active(&mut tx, appointment, None).await? {
            tx.rollback().await?;
            return Ok(AppointmentWrite::Conflict);
        }
        match insert_appointment(&mut tx, appointment).await {
            Ok(_) => {}
            Err(e) if is_exclusion_violation(&e) => {
                tx.rollback().await?;
                return Ok(AppointmentWrite::Conflict);
            }
            Err(e) => {
                error!(
                    "Unable to insert appointment: {:?}. DB returned error: {:?}",
                    appointment, e
                );
                return Err(e.into());
            }
        }
        tx.commit().await?;

        Ok(AppointmentWrite::Written)
    }

    async fn reschedule(
        &self,
        cancelled: &Appointment,
        previous_status: AppointmentStatus,
        replacement: &Appointment,
    ) -> anyhow::Result<AppointmentWrite> {
        let mut tx = self.pool.begin().await?;
        lock_resource(&mut tx, &replacement.resource_id).await?;

        if overlaps_active(&mut tx, replacement, Some(&cancelled.id)).await? {
            tx.rollback().await?;
            return Ok(AppointmentWrite::Conflict);
        }
        if !update_status(&mut *tx, cancelled, previous_status).await? {
            tx.rollback().await?;
            return Ok(AppointmentWrite::Stale);
        }
        match insert_appointment(&mut tx, replacement).await {
            Ok(_) => {}
            Err(e) if is_exclusion_violation(&e) => {
                tx.rollback().await?;
                return Ok(AppointmentWrite::Conflict);
            }
            Err(e) => return Err(e.into()),
        }
        tx.commit().await?;

        Ok(AppointmentWrite::Written)
    }

    async fn save(
        &self,
        appointment: &Appointment,
        previous_status: AppointmentStatus,
    ) -> anyhow::Result<AppointmentWrite> {
        let written = update_status(&self.pool, appointment, previous_status)
            .await
            .map_err(|e| {
                error!(
                    "Unable to save appointment: {:?}. DB returned error: {:?}",
                    appointment, e
                );
                e
            })?;
        if written {
            Ok(AppointmentWrite::Written)
        } else {
            Ok(AppointmentWrite::Stale)
        }
    }

    async fn find(&self, appointment_id: &ID) -> anyhow::Result<Option<Appointment>> {
        let res: Option<AppointmentRaw> = sqlx::query_as(
            r#"
            SELECT * FROM appointments AS a
            WHERE a.appointment_uid = $1
            "#,
        )
        .bind(appointment_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find appointment with id: {:?} failed. DB returned error: {:?}",
                appointment_id, e
            );
            e
        })?;

        res.map(|a| a.try_into()).transpose()
    }

    async fn find_many(&self, tenant_id: &ID, appointment_ids: &[ID]) -> anyhow::Result<Vec<Appointment>> {
        let ids = appointment_ids
            .iter()
            .map(|id| *id.inner_ref())
            .collect::<Vec<_>>();
        let raws: Vec<AppointmentRaw> = sqlx::query_as(
            r#"
            SELECT * FROM appointments AS a
            WHERE a.tenant_uid = $1 AND a.appointment_uid = ANY($2)
            "#,
        )
        .bind(tenant_id.inner_ref())
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        into_appointments(raws)
    }

    async fn find_by_resource(
        &self,
        resource_id: &ID,
        start_ts: i64,
        end_ts: i64,
    ) -> anyhow::Result<Vec<Appointment>> {
        let raws: Vec<AppointmentRaw> = sqlx::query_as(
            r#"
            SELECT * FROM appointments AS a
            WHERE a.resource_uid = $1 AND
            a.start_ts < $3 AND
            a.end_ts > $2
            ORDER BY a.start_ts
            "#,
        )
        .bind(resource_id.inner_ref())
        .bind(start_ts)
        .bind(end_ts)
        .fetch_all(&self.pool)
        .await?;

        into_appointments(raws)
    }
}
