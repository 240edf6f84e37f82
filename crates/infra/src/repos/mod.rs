mod appointment;
mod client;
mod idempotency;
mod notification_log;
mod notification_template;
mod reminder_job;
mod resource;
mod service;
mod shared;
mod tenant;

use appointment::{IAppointmentRepo, InMemoryAppointmentRepo, PostgresAppointmentRepo};
use client::{IClientRepo, InMemoryClientRepo, PostgresClientRepo};
use idempotency::{IIdempotencyRepo, InMemoryIdempotencyRepo, PostgresIdempotencyRepo};
use notification_log::{
    INotificationLogRepo, InMemoryNotificationLogRepo, PostgresNotificationLogRepo,
};
use notification_template::{
    INotificationTemplateRepo, InMemoryNotificationTemplateRepo, PostgresNotificationTemplateRepo,
};
use reminder_job::{InMemoryReminderJobRepo, PostgresReminderJobRepo};
use resource::{IResourceRepo, InMemoryResourceRepo, PostgresResourceRepo};
use service::{InMemoryServiceRepo, PostgresServiceRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tenant::{ITenantRepo, InMemoryTenantRepo, PostgresTenantRepo};
use tracing::info;

pub use appointment::AppointmentWrite;
pub use notification_log::NotificationLogQuery;
pub use reminder_job::IReminderJobRepo;
pub use service::IServiceRepo;

#[derive(Clone)]
pub struct Repos {
    pub tenants: Arc<dyn ITenantRepo>,
    pub resources: Arc<dyn IResourceRepo>,
    pub services: Arc<dyn IServiceRepo>,
    pub clients: Arc<dyn IClientRepo>,
    pub appointments: Arc<dyn IAppointmentRepo>,
    pub reminder_jobs: Arc<dyn IReminderJobRepo>,
    pub notification_templates: Arc<dyn INotificationTemplateRepo>,
    pub notification_logs: Arc<dyn INotificationLogRepo>,
    pub idempotency: Arc<dyn IIdempotencyRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        info!("DB RUNNING MIGRATIONS ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB RUNNING MIGRATIONS ... [done]");

        Ok(Self {
            tenants: Arc::new(PostgresTenantRepo::new(pool.clone())),
            resources: Arc::new(PostgresResourceRepo::new(pool.clone())),
            services: Arc::new(PostgresServiceRepo::new(pool.clone())),
            clients: Arc::new(PostgresClientRepo::new(pool.clone())),
            appointments: Arc::new(PostgresAppointmentRepo::new(pool.clone())),
            reminder_jobs: Arc::new(PostgresReminderJobRepo::new(pool.clone())),
            notification_templates: Arc::new(PostgresNotificationTemplateRepo::new(pool.clone())),
            notification_logs: Arc::new(PostgresNotificationLogRepo::new(pool.clone())),
            idempotency: Arc::new(PostgresIdempotencyRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            tenants: Arc::new(InMemoryTenantRepo::new()),
            resources: Arc::new(InMemoryResourceRepo::new()),
            services: Arc::new(InMemoryServiceRepo::new()),
            clients: Arc::new(InMemoryClientRepo::new()),
            appointments: Arc::new(InMemoryAppointmentRepo::new()),
            reminder_jobs: Arc::new(InMemoryReminderJobRepo::new()),
            notification_templates: Arc::new(InMemoryNotificationTemplateRepo::new()),
            notification_logs: Arc::new(InMemoryNotificationLogRepo::new()),
            idempotency: Arc::new(InMemoryIdempotencyRepo::new()),
        }
    }
}
