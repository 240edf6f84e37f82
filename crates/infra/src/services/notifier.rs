use reqwest::Client;
use salon_scheduler_domain::ID;
use serde::Serialize;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};
use tracing::{error, info};

/// A rendered message for one client on one channel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingNotification {
    pub tenant_id: ID,
    pub client_id: ID,
    pub appointment_id: Option<ID>,
    pub channel: String,
    /// Address of the client on the channel, e.g. a chat id or a phone number
    pub recipient: Option<String>,
    pub notification_type: String,
    pub title: String,
    pub text: String,
}

/// Delivers notifications to the messaging channels
#[async_trait::async_trait]
pub trait INotificationTransport: Send + Sync {
    async fn send(&self, notification: &OutgoingNotification) -> anyhow::Result<()>;
}

/// Posts every notification as JSON to a gateway that talks to the channels
pub struct WebhookTransport {
    client: Client,
    url: String,
}

impl WebhookTransport {
    pub fn new(url: String) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }
}

#[async_trait::async_trait]
impl INotificationTransport for WebhookTransport {
    async fn send(&self, notification: &OutgoingNotification) -> anyhow::Result<()> {
        match self.client.post(&self.url).json(notification).send().await {
            Ok(res) if res.status().is_success() => Ok(()),
            Ok(res) => {
                error!(
                    "[Unexpected Response] Notification webhook returned status: {}",
                    res.status()
                );
                Err(anyhow::Error::msg(format!(
                    "Notification webhook returned status: {}",
                    res.status()
                )))
            }
            Err(e) => {
                error!(
                    "[Network Error] Notification webhook error. Error message: {:?}",
                    e
                );
                Err(anyhow::Error::new(e))
            }
        }
    }
}

/// Only logs the notifications. Used when no webhook is configured.
pub struct LoggingTransport {}

#[async_trait::async_trait]
impl INotificationTransport for LoggingTransport {
    async fn send(&self, notification: &OutgoingNotification) -> anyhow::Result<()> {
        info!(
            "Notification {} to client {} on {}: {}",
            notification.notification_type,
            notification.client_id,
            notification.channel,
            notification.text
        );
        Ok(())
    }
}

/// Keeps the sent notifications in memory, for tests
pub struct InMemoryTransport {
    sent: Mutex<Vec<OutgoingNotification>>,
    fail: AtomicBool,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(vec![]),
            fail: AtomicBool::new(false),
        }
    }

    /// Makes every following `send` fail
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<OutgoingNotification> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl INotificationTransport for InMemoryTransport {
    async fn send(&self, notification: &OutgoingNotification) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow::Error::msg("Channel unavailable"));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}
