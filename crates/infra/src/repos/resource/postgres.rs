use super::IResourceRepo;
use salon_scheduler_domain::{Resource, WorkingHours, ID};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};
use tracing::error;

pub struct PostgresResourceRepo {
    pool: PgPool,
}

impl PostgresResourceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ResourceRaw {
    resource_uid: Uuid,
    tenant_uid: Uuid,
    name: String,
    working_hours: Json<Vec<WorkingHours>>,
}

impl From<ResourceRaw> for Resource {
    fn from(e: ResourceRaw) -> Self {
        Self {
            id: e.resource_uid.into(),
            tenant_id: e.tenant_uid.into(),
            name: e.name,
            working_hours: e.working_hours.0,
        }
    }
}

#[async_trait::async_trait]
impl IResourceRepo for PostgresResourceRepo {
    async fn insert(&self, resource: &Resource) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO resources(resource_uid, tenant_uid, name, working_hours)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(resource.id.inner_ref())
        .bind(resource.tenant_id.inner_ref())
        .bind(&resource.name)
        .bind(Json(&resource.working_hours))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert resource: {:?}. DB returned error: {:?}",
                resource, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, resource_id: &ID) -> anyhow::Result<Option<Resource>> {
        let res: Option<ResourceRaw> = sqlx::query_as(
            r#"
            SELECT * FROM resources AS r
            WHERE r.resource_uid = $1
            "#,
        )
        .bind(resource_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find resource with id: {:?} failed. DB returned error: {:?}",
                resource_id, e
            );
            e
        })?;

        Ok(res.map(|resource| resource.into()))
    }

    async fn find_by_tenant(&self, tenant_id: &ID) -> anyhow::Result<Vec<Resource>> {
        let resources: Vec<ResourceRaw> = sqlx::query_as(
            r#"
            SELECT * FROM resources AS r
            WHERE r.tenant_uid = $1
            ORDER BY r.name
            "#,
        )
        .bind(tenant_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        Ok(resources.into_iter().map(|r| r.into()).collect())
    }
}
