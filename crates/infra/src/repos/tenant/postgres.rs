use super::ITenantRepo;
use salon_scheduler_domain::{Tenant, TenantSettings, ID};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};
use tracing::error;

pub struct PostgresTenantRepo {
    pool: PgPool,
}

impl PostgresTenantRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TenantRaw {
    tenant_uid: Uuid,
    name: String,
    settings: Json<TenantSettings>,
}

impl From<TenantRaw> for Tenant {
    fn from(e: TenantRaw) -> Self {
        Self {
            id: e.tenant_uid.into(),
            name: e.name,
            settings: e.settings.0,
        }
    }
}

#[async_trait::async_trait]
impl ITenantRepo for PostgresTenantRepo {
    async fn insert(&self, tenant: &Tenant) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tenants(tenant_uid, name, settings)
            VALUES($1, $2, $3)
            "#,
        )
        .bind(tenant.id.inner_ref())
        .bind(&tenant.name)
        .bind(Json(&tenant.settings))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to insert tenant: {:?}. DB returned error: {:?}", tenant, e);
            e
        })?;
        Ok(())
    }

    async fn save(&self, tenant: &Tenant) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE tenants SET
                name = $2,
                settings = $3
            WHERE tenant_uid = $1
            "#,
        )
        .bind(tenant.id.inner_ref())
        .bind(&tenant.name)
        .bind(Json(&tenant.settings))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to save tenant: {:?}. DB returned error: {:?}", tenant, e);
            e
        })?;
        Ok(())
    }

    async fn find(&self, tenant_id: &ID) -> anyhow::Result<Option<Tenant>> {
        let res: Option<TenantRaw> = sqlx::query_as(
            r#"
            SELECT * FROM tenants AS t
            WHERE t.tenant_uid = $1
            "#,
        )
        .bind(tenant_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find tenant with id: {:?} failed. DB returned error: {:?}",
                tenant_id, e
            );
            e
        })?;

        Ok(res.map(|tenant| tenant.into()))
    }
}
