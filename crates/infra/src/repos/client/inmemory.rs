use super::IClientRepo;
use crate::repos::shared::inmemory_repo::*;
use salon_scheduler_domain::{Client, ClientIdentity, ID};

pub struct InMemoryClientRepo {
    clients: std::sync::Mutex<Vec<Client>>,
}

impl InMemoryClientRepo {
    pub fn new() -> Self {
        Self {
            clients: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IClientRepo for InMemoryClientRepo {
    async fn insert(&self, client: &Client) -> anyhow::Result<()> {
        insert(client, &self.clients);
        Ok(())
    }

    async fn find(&self, client_id: &ID) -> anyhow::Result<Option<Client>> {
        Ok(find(client_id, &self.clients))
    }

    async fn find_by_identity(
        &self,
        tenant_id: &ID,
        identity: &ClientIdentity,
    ) -> anyhow::Result<Option<Client>> {
        Ok(find_by(&self.clients, |c| c.tenant_id == *tenant_id && c.matches(identity))
            .into_iter()
            .next())
    }
}
