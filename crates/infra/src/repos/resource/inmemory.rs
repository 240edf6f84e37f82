use super::IResourceRepo;
use crate::repos::shared::inmemory_repo::*;
use salon_scheduler_domain::{Resource, ID};

pub struct InMemoryResourceRepo {
    resources: std::sync::Mutex<Vec<Resource>>,
}

impl InMemoryResourceRepo {
    pub fn new() -> Self {
        Self {
            resources: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IResourceRepo for InMemoryResourceRepo {
    async fn insert(&self, resource: &Resource) -> anyhow::Result<()> {
        insert(resource, &self.resources);
        Ok(())
    }

    async fn find(&self, resource_id: &ID) -> anyhow::Result<Option<Resource>> {
        Ok(find(resource_id, &self.resources))
    }

    async fn find_by_tenant(&self, tenant_id: &ID) -> anyhow::Result<Vec<Resource>> {
        let mut resources = find_by(&self.resources, |r| r.tenant_id == *tenant_id);
        resources.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(resources)
    }
}
