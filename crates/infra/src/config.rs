use salon_scheduler_utils::create_random_secret;
use std::str::FromStr;
use tracing::{info, warn};

const DAY_MILLIS: i64 = 1000 * 60 * 60 * 24;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Shared secret the messaging channels send along with inbound webhooks
    pub inbound_webhook_secret: String,
    /// Gateway receiving outgoing notifications. When missing the
    /// notifications are only logged.
    pub notification_webhook_url: Option<String>,
    /// Minimum time in millis a sent reminder is remembered, so that it is
    /// never sent twice
    pub reminder_idempotency_ttl: i64,
    /// Time in millis an inbound idempotency key is remembered
    pub inbound_idempotency_ttl: i64,
    /// Maximum allowed duration in millis for querying notification stats.
    /// This is used to avoid having clients ask for stats in a timespan of
    /// several years.
    pub stats_query_duration_limit: i64,
    /// Default duration in millis of the stats range when none is given
    pub stats_default_duration: i64,
    /// Skip starting the background jobs, used by the tests
    pub disable_job_schedulers: bool,
}

fn parse_env<T: FromStr + std::fmt::Display>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(value) => match value.parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default value: {}.",
                    name, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

impl Config {
    pub fn new() -> Self {
        let inbound_webhook_secret = match std::env::var("INBOUND_WEBHOOK_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                info!("Did not find INBOUND_WEBHOOK_SECRET environment variable. Going to create one.");
                let secret = create_random_secret(16);
                info!(
                    "Secret for inbound webhooks was generated and set to: {}",
                    secret
                );
                secret
            }
        };
        let notification_webhook_url = std::env::var("NOTIFICATION_WEBHOOK_URL").ok();
        if notification_webhook_url.is_none() {
            info!("Did not find NOTIFICATION_WEBHOOK_URL environment variable. Notifications will only be logged.");
        }
        let disable_job_schedulers = std::env::var("DISABLE_JOB_SCHEDULERS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Self {
            port: parse_env("PORT", 5000),
            inbound_webhook_secret,
            notification_webhook_url,
            reminder_idempotency_ttl: parse_env("REMINDER_IDEMPOTENCY_TTL_SECS", 60 * 60 * 24 * 7)
                * 1000,
            inbound_idempotency_ttl: parse_env("INBOUND_IDEMPOTENCY_TTL_SECS", 60 * 60 * 24) * 1000,
            stats_query_duration_limit: DAY_MILLIS * 366,
            stats_default_duration: DAY_MILLIS * 30,
            disable_job_schedulers,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
