mod inmemory;
mod postgres;

pub use inmemory::InMemoryNotificationTemplateRepo;
pub use postgres::PostgresNotificationTemplateRepo;
use salon_scheduler_domain::{NotificationTemplate, ID};

#[async_trait::async_trait]
pub trait INotificationTemplateRepo: Send + Sync {
    async fn insert(&self, template: &NotificationTemplate) -> anyhow::Result<()>;
    /// Templates of the given (channel, type) pair, active or not. `None` as the
    /// tenant selects the platform wide default set.
    async fn find(
        &self,
        tenant_id: Option<&ID>,
        channel: &str,
        notification_type: &str,
    ) -> anyhow::Result<Vec<NotificationTemplate>>;
}
