mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
use repos::Repos;
pub use repos::{AppointmentWrite, IReminderJobRepo, IServiceRepo, NotificationLogQuery};
pub use services::*;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::info;

#[derive(Clone)]
pub struct SalonContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub notifier: Arc<dyn INotificationTransport>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

fn create_notifier(config: &Config) -> Arc<dyn INotificationTransport> {
    match &config.notification_webhook_url {
        Some(url) => Arc::new(WebhookTransport::new(url.clone())),
        None => Arc::new(LoggingTransport {}),
    }
}

impl SalonContext {
    /// Context with inmemory repositories, the real clock and a transport
    /// that only logs
    pub fn create_inmemory() -> Self {
        let config = Config::new();
        Self {
            repos: Repos::create_inmemory(),
            notifier: create_notifier(&config),
            config,
            sys: Arc::new(RealSys {}),
        }
    }

    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        let config = Config::new();
        Self {
            repos,
            notifier: create_notifier(&config),
            config,
            sys: Arc::new(RealSys {}),
        }
    }
}

const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> SalonContext {
    match std::env::var(PSQL_CONNECTION_STRING) {
        Ok(postgres_connection_string) => {
            info!(
                "{} env var was provided. Going to use postgres.",
                PSQL_CONNECTION_STRING
            );
            SalonContext::create(ContextParams {
                postgres_connection_string,
            })
            .await
        }
        Err(_) => {
            info!(
                "{} env var was not provided. Going to use inmemory infra.",
                PSQL_CONNECTION_STRING
            );
            SalonContext::create_inmemory()
        }
    }
}

/// Runs the migrations against the database given by the environment
pub async fn run_migration() -> anyhow::Result<()> {
    let connection_string = std::env::var(PSQL_CONNECTION_STRING)
        .map_err(|_| anyhow::Error::msg(format!("{} env var to be present.", PSQL_CONNECTION_STRING)))?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&connection_string)
        .await?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e: MigrateError| anyhow::Error::new(e))
}
