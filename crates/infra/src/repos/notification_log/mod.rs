mod inmemory;
mod postgres;

pub use inmemory::InMemoryNotificationLogRepo;
pub use postgres::PostgresNotificationLogRepo;
use salon_scheduler_domain::{NotificationLog, ID};

#[derive(Debug, Clone)]
pub struct NotificationLogQuery {
    pub tenant_id: ID,
    pub channel: String,
    pub notification_type: String,
    /// Inclusive
    pub from_ts: i64,
    /// Exclusive
    pub to_ts: i64,
}

#[async_trait::async_trait]
pub trait INotificationLogRepo: Send + Sync {
    async fn insert(&self, log: &NotificationLog) -> anyhow::Result<()>;
    async fn find_by_query(&self, query: &NotificationLogQuery) -> anyhow::Result<Vec<NotificationLog>>;
}
