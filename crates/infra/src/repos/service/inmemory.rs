use super::IServiceRepo;
use crate::repos::shared::inmemory_repo::*;
use salon_scheduler_domain::{Service, ID};

pub struct InMemoryServiceRepo {
    services: std::sync::Mutex<Vec<Service>>,
}

impl InMemoryServiceRepo {
    pub fn new() -> Self {
        Self {
            services: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IServiceRepo for InMemoryServiceRepo {
    async fn insert(&self, service: &Service) -> anyhow::Result<()> {
        insert(service, &self.services);
        Ok(())
    }

    async fn find(&self, service_id: &ID) -> anyhow::Result<Option<Service>> {
        Ok(find(service_id, &self.services))
    }
}
