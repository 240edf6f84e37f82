use super::INotificationTemplateRepo;
use salon_scheduler_domain::{NotificationTemplate, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresNotificationTemplateRepo {
    pool: PgPool,
}

impl PostgresNotificationTemplateRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TemplateRaw {
    template_uid: Uuid,
    tenant_uid: Option<Uuid>,
    channel: String,
    notification_type: String,
    variant_key: String,
    title: String,
    body: String,
    is_active: bool,
}

impl From<TemplateRaw> for NotificationTemplate {
    fn from(e: TemplateRaw) -> Self {
        Self {
            id: e.template_uid.into(),
            tenant_id: e.tenant_uid.map(|id| id.into()),
            channel: e.channel,
            notification_type: e.notification_type,
            variant_key: e.variant_key,
            title: e.title,
            body: e.body,
            is_active: e.is_active,
        }
    }
}

#[async_trait::async_trait]
impl INotificationTemplateRepo for PostgresNotificationTemplateRepo {
    async fn insert(&self, template: &NotificationTemplate) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notification_templates
            (template_uid, tenant_uid, channel, notification_type, variant_key, title, body, is_active)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(template.id.inner_ref())
        .bind(template.tenant_id.as_ref().map(|id| *id.inner_ref()))
        .bind(&template.channel)
        .bind(&template.notification_type)
        .bind(&template.variant_key)
        .bind(&template.title)
        .bind(&template.body)
        .bind(template.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert notification template: {:?}. DB returned error: {:?}",
                template, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(
        &self,
        tenant_id: Option<&ID>,
        channel: &str,
        notification_type: &str,
    ) -> anyhow::Result<Vec<NotificationTemplate>> {
        let raws: Vec<TemplateRaw> = sqlx::query_as(
            r#"
            SELECT * FROM notification_templates AS t
            WHERE t.tenant_uid IS NOT DISTINCT FROM $1 AND
            t.channel = $2 AND
            t.notification_type = $3
            ORDER BY t.variant_key
            "#,
        )
        .bind(tenant_id.map(|id| *id.inner_ref()))
        .bind(channel)
        .bind(notification_type)
        .fetch_all(&self.pool)
        .await?;

        Ok(raws.into_iter().map(|t| t.into()).collect())
    }
}
