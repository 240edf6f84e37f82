use super::{INotificationLogRepo, NotificationLogQuery};
use salon_scheduler_domain::NotificationLog;
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::{TryFrom, TryInto};
use tracing::error;

pub struct PostgresNotificationLogRepo {
    pool: PgPool,
}

impl PostgresNotificationLogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct NotificationLogRaw {
    log_uid: Uuid,
    tenant_uid: Uuid,
    template_uid: Option<Uuid>,
    variant_key: String,
    channel: String,
    notification_type: String,
    status: String,
    client_uid: Uuid,
    appointment_uid: Option<Uuid>,
    text: String,
    error: Option<String>,
    created: i64,
}

impl TryFrom<NotificationLogRaw> for NotificationLog {
    type Error = anyhow::Error;

    fn try_from(e: NotificationLogRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: e.log_uid.into(),
            tenant_id: e.tenant_uid.into(),
            template_id: e.template_uid.map(|id| id.into()),
            variant_key: e.variant_key,
            channel: e.channel,
            notification_type: e.notification_type,
            status: e.status.parse()?,
            client_id: e.client_uid.into(),
            appointment_id: e.appointment_uid.map(|id| id.into()),
            text: e.text,
            error: e.error,
            created: e.created,
        })
    }
}

#[async_trait::async_trait]
impl INotificationLogRepo for PostgresNotificationLogRepo {
    async fn insert(&self, log: &NotificationLog) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notification_logs
            (log_uid, tenant_uid, template_uid, variant_key, channel, notification_type, status, client_uid, appointment_uid, text, error, created)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(log.id.inner_ref())
        .bind(log.tenant_id.inner_ref())
        .bind(log.template_id.as_ref().map(|id| *id.inner_ref()))
        .bind(&log.variant_key)
        .bind(&log.channel)
        .bind(&log.notification_type)
        .bind(log.status.as_str())
        .bind(log.client_id.inner_ref())
        .bind(log.appointment_id.as_ref().map(|id| *id.inner_ref()))
        .bind(&log.text)
        .bind(&log.error)
        .bind(log.created)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert notification log: {:?}. DB returned error: {:?}",
                log, e
            );
            e
        })?;
        Ok(())
    }

    async fn find_by_query(&self, query: &NotificationLogQuery) -> anyhow::Result<Vec<NotificationLog>> {
        let raws: Vec<NotificationLogRaw> = sqlx::query_as(
            r#"
            SELECT * FROM notification_logs AS l
            WHERE l.tenant_uid = $1 AND
            l.channel = $2 AND
            l.notification_type = $3 AND
            l.created >= $4 AND
            l.created < $5
            "#,
        )
        .bind(query.tenant_id.inner_ref())
        .bind(&query.channel)
        .bind(&query.notification_type)
        .bind(query.from_ts)
        .bind(query.to_ts)
        .fetch_all(&self.pool)
        .await?;

        raws.into_iter().map(|l| l.try_into()).collect()
    }
}
