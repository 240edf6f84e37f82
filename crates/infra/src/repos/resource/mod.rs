mod inmemory;
mod postgres;

pub use inmemory::InMemoryResourceRepo;
pub use postgres::PostgresResourceRepo;
use salon_scheduler_domain::{Resource, ID};

#[async_trait::async_trait]
pub trait IResourceRepo: Send + Sync {
    async fn insert(&self, resource: &Resource) -> anyhow::Result<()>;
    async fn find(&self, resource_id: &ID) -> anyhow::Result<Option<Resource>>;
    /// Ordered by name
    async fn find_by_tenant(&self, tenant_id: &ID) -> anyhow::Result<Vec<Resource>>;
}
