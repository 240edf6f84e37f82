use super::IServiceRepo;
use salon_scheduler_domain::{Service, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresServiceRepo {
    pool: PgPool,
}

impl PostgresServiceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ServiceRaw {
    service_uid: Uuid,
    tenant_uid: Uuid,
    name: String,
    duration_minutes: i64,
    buffer_before_minutes: Option<i64>,
    buffer_after_minutes: Option<i64>,
}

impl From<ServiceRaw> for Service {
    fn from(e: ServiceRaw) -> Self {
        Self {
            id: e.service_uid.into(),
            tenant_id: e.tenant_uid.into(),
            name: e.name,
            duration_minutes: e.duration_minutes,
            buffer_before_minutes: e.buffer_before_minutes,
            buffer_after_minutes: e.buffer_after_minutes,
        }
    }
}

#[async_trait::async_trait]
impl IServiceRepo for PostgresServiceRepo {
    async fn insert(&self, service: &Service) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO services(service_uid, tenant_uid, name, duration_minutes, buffer_before_minutes, buffer_after_minutes)
            VALUES($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(service.id.inner_ref())
        .bind(service.tenant_id.inner_ref())
        .bind(&service.name)
        .bind(service.duration_minutes)
        .bind(service.buffer_before_minutes)
        .bind(service.buffer_after_minutes)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert service: {:?}. DB returned error: {:?}",
                service, e
            );
            e
        })?;

        Ok(())
    }

    async fn find(&self, service_id: &ID) -> anyhow::Result<Option<Service>> {
        let res: Option<ServiceRaw> = sqlx::query_as(
            r#"
            SELECT * FROM services AS s
            WHERE s.service_uid = $1
            "#,
        )
        .bind(service_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find service with id: {:?} failed. DB returned error: {:?}",
                service_id, e
            );
            e
        })?;

        Ok(res.map(|service| service.into()))
    }
}
