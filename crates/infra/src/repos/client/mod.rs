mod inmemory;
mod postgres;

pub use inmemory::InMemoryClientRepo;
pub use postgres::PostgresClientRepo;
use salon_scheduler_domain::{Client, ClientIdentity, ID};

#[async_trait::async_trait]
pub trait IClientRepo: Send + Sync {
    async fn insert(&self, client: &Client) -> anyhow::Result<()>;
    async fn find(&self, client_id: &ID) -> anyhow::Result<Option<Client>>;
    /// Client of the tenant with the same phone or the same channel identity
    async fn find_by_identity(
        &self,
        tenant_id: &ID,
        identity: &ClientIdentity,
    ) -> anyhow::Result<Option<Client>>;
}
