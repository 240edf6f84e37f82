use super::INotificationTemplateRepo;
use crate::repos::shared::inmemory_repo::*;
use salon_scheduler_domain::{NotificationTemplate, ID};
use std::sync::Mutex;

pub struct InMemoryNotificationTemplateRepo {
    templates: Mutex<Vec<NotificationTemplate>>,
}

impl InMemoryNotificationTemplateRepo {
    pub fn new() -> Self {
        Self {
            templates: Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl INotificationTemplateRepo for InMemoryNotificationTemplateRepo {
    async fn insert(&self, template: &NotificationTemplate) -> anyhow::Result<()> {
        insert(template, &self.templates);
        Ok(())
    }

    async fn find(
        &self,
        tenant_id: Option<&ID>,
        channel: &str,
        notification_type: &str,
    ) -> anyhow::Result<Vec<NotificationTemplate>> {
        Ok(find_by(&self.templates, |t| {
            t.tenant_id.as_ref() == tenant_id
                && t.channel == channel
                && t.notification_type == notification_type
        }))
    }
}
