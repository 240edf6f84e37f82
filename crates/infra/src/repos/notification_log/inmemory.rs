use super::{INotificationLogRepo, NotificationLogQuery};
use crate::repos::shared::inmemory_repo::*;
use salon_scheduler_domain::NotificationLog;
use std::sync::Mutex;

pub struct InMemoryNotificationLogRepo {
    logs: Mutex<Vec<NotificationLog>>,
}

impl InMemoryNotificationLogRepo {
    pub fn new() -> Self {
        Self {
            logs: Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl INotificationLogRepo for InMemoryNotificationLogRepo {
    async fn insert(&self, log: &NotificationLog) -> anyhow::Result<()> {
        insert(log, &self.logs);
        Ok(())
    }

    async fn find_by_query(&self, query: &NotificationLogQuery) -> anyhow::Result<Vec<NotificationLog>> {
        Ok(find_by(&self.logs, |l| {
            l.tenant_id == query.tenant_id
                && l.channel == query.channel
                && l.notification_type == query.notification_type
                && l.created >= query.from_ts
                && l.created < query.to_ts
        }))
    }
}
