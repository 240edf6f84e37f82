mod notifier;

pub use notifier::{
    INotificationTransport, InMemoryTransport, LoggingTransport, OutgoingNotification,
    WebhookTransport,
};
