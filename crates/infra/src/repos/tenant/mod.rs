mod inmemory;
mod postgres;

pub use inmemory::InMemoryTenantRepo;
pub use postgres::PostgresTenantRepo;
use salon_scheduler_domain::{Tenant, ID};

#[async_trait::async_trait]
pub trait ITenantRepo: Send + Sync {
    async fn insert(&self, tenant: &Tenant) -> anyhow::Result<()>;
    async fn save(&self, tenant: &Tenant) -> anyhow::Result<()>;
    async fn find(&self, tenant_id: &ID) -> anyhow::Result<Option<Tenant>>;
}

#[cfg(test)]
mod tests {
    use crate::setup_context;
    use salon_scheduler_domain::{QuietHours, Tenant, Time};

    #[tokio::test]
    async fn it_stores_tenant_settings() {
        let ctx = setup_context().await;
        let mut tenant = Tenant::new("Studio");
        tenant.settings.timezone = chrono_tz::Europe::Oslo;
        ctx.repos.tenants.insert(&tenant).await.unwrap();

        let found = ctx.repos.tenants.find(&tenant.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Studio");
        assert_eq!(found.settings, tenant.settings);

        tenant.settings.quiet_hours = QuietHours::new(Time::new(21, 0), Time::new(8, 0));
        ctx.repos.tenants.save(&tenant).await.unwrap();
        let found = ctx.repos.tenants.find(&tenant.id).await.unwrap().unwrap();
        assert_eq!(found.settings.quiet_hours.start, Time::new(21, 0));

        assert!(ctx.repos.tenants.find(&Default::default()).await.unwrap().is_none());
    }
}
