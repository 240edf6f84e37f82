mod inmemory;
mod postgres;

pub use inmemory::InMemoryServiceRepo;
pub use postgres::PostgresServiceRepo;
use salon_scheduler_domain::{Service, ID};

#[async_trait::async_trait]
pub trait IServiceRepo: Send + Sync {
    async fn insert(&self, service: &Service) -> anyhow::Result<()>;
    async fn find(&self, service_id: &ID) -> anyhow::Result<Option<Service>>;
}

#[cfg(test)]
mod tests {
    use crate::setup_context;
    use salon_scheduler_domain::{Service, Tenant};

    #[tokio::test]
    async fn it_stores_service_buffers() {
        let ctx = setup_context().await;
        let tenant = Tenant::new("Studio");
        ctx.repos.tenants.insert(&tenant).await.unwrap();

        let mut service = Service::new(tenant.id.clone(), "Coloring", 90);
        service.buffer_after_minutes = Some(15);
        ctx.repos.services.insert(&service).await.unwrap();

        let found = ctx.repos.services.find(&service.id).await.unwrap().unwrap();
        assert_eq!(found.duration_minutes, 90);
        assert_eq!(found.buffer_before_minutes, None);
        assert_eq!(found.buffer_after_minutes, Some(15));
        assert_eq!(found.tenant_id, tenant.id);
    }
}
