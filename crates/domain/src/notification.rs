use crate::{
    reminder::{REMINDER_1H, REMINDER_24H},
    shared::entity::{Entity, ID},
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_VARIANT_KEY: &str = "A";

/// One A/B variant of the text sent for a (channel, type) pair.
///
/// Templates without a `tenant_id` make up the platform wide default set.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationTemplate {
    pub id: ID,
    pub tenant_id: Option<ID>,
    pub channel: String,
    pub notification_type: String,
    pub variant_key: String,
    pub title: String,
    pub body: String,
    pub is_active: bool,
}

impl Entity for NotificationTemplate {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Sent,
    Failed,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for NotificationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(Self::Sent),
            "failed" => Ok(Self::Failed),
            _ => Err(anyhow::Error::msg(format!("Unknown notification status: {}", s))),
        }
    }
}

/// Append only record of a single delivery attempt
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationLog {
    pub id: ID,
    pub tenant_id: ID,
    pub template_id: Option<ID>,
    pub variant_key: String,
    pub channel: String,
    pub notification_type: String,
    pub status: NotificationStatus,
    pub client_id: ID,
    pub appointment_id: Option<ID>,
    pub text: String,
    pub error: Option<String>,
    pub created: i64,
}

impl Entity for NotificationLog {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// The template chosen for one client
#[derive(Debug, Clone, PartialEq)]
pub struct AssignedTemplate {
    pub template_id: Option<ID>,
    pub variant_key: String,
    pub title: String,
    pub body: String,
}

impl From<&NotificationTemplate> for AssignedTemplate {
    fn from(t: &NotificationTemplate) -> Self {
        Self {
            template_id: Some(t.id.clone()),
            variant_key: t.variant_key.clone(),
            title: t.title.clone(),
            body: t.body.clone(),
        }
    }
}

/// Active variants of the set ordered by variant key
fn variants<'a>(
    templates: &'a [NotificationTemplate],
    channel: &str,
    notification_type: &str,
) -> Vec<&'a NotificationTemplate> {
    let mut variants = templates
        .iter()
        .filter(|t| t.is_active && t.channel == channel && t.notification_type == notification_type)
        .collect::<Vec<_>>();
    variants.sort_by(|a, b| a.variant_key.cmp(&b.variant_key));
    variants
}

/// Picks the variant at `client_key mod n` among the tenant's active
/// variants, falling back to the default set and then to a built in text.
///
/// The choice is stable for a fixed client and a fixed variant set. Adding
/// or removing a variant can move clients to another variant.
pub fn assign_variant(
    tenant_templates: &[NotificationTemplate],
    default_templates: &[NotificationTemplate],
    channel: &str,
    notification_type: &str,
    client_key: u64,
) -> AssignedTemplate {
    for set in &[tenant_templates, default_templates] {
        let variants = variants(set, channel, notification_type);
        if !variants.is_empty() {
            let idx = (client_key % variants.len() as u64) as usize;
            return AssignedTemplate::from(variants[idx]);
        }
    }

    builtin_template(notification_type)
}

pub fn builtin_template(notification_type: &str) -> AssignedTemplate {
    let (title, body) = match notification_type {
        REMINDER_24H => (
            "Reminder 24 hours before",
            "Hi {clientName}! This is a reminder of your appointment tomorrow.\n\nDate: {date}\nTime: {time}\nService: {serviceName}\nWith: {resourceName}\n\nReply to this message if you need to reschedule or cancel.",
        ),
        REMINDER_1H => (
            "Reminder 1 hour before",
            "Hi {clientName}! Your appointment starts in about an hour.\n\nDate: {date}\nTime: {time}\nService: {serviceName}\nWith: {resourceName}\n\nReply to this message if you need to reschedule or cancel.",
        ),
        _ => (
            "Notification",
            "You have an appointment on {date} at {time}. Service: {serviceName}, with {resourceName}.",
        ),
    };

    AssignedTemplate {
        template_id: None,
        variant_key: DEFAULT_VARIANT_KEY.into(),
        title: title.into(),
        body: body.into(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct TemplateVariables {
    pub client_name: Option<String>,
    pub service_name: Option<String>,
    pub resource_name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub business_name: Option<String>,
}

/// Replaces every `{placeholder}` in the body, using a neutral word when a
/// value is missing
pub fn render_template(body: &str, vars: &TemplateVariables) -> String {
    let or = |value: &Option<String>, default: &str| value.clone().unwrap_or_else(|| default.to_string());
    let replacements = [
        ("{clientName}", or(&vars.client_name, "there")),
        ("{serviceName}", or(&vars.service_name, "your service")),
        ("{resourceName}", or(&vars.resource_name, "our staff")),
        ("{date}", or(&vars.date, "")),
        ("{time}", or(&vars.time, "")),
        ("{businessName}", or(&vars.business_name, "our salon")),
    ];

    replacements
        .iter()
        .fold(body.to_string(), |text, (placeholder, value)| {
            text.replace(placeholder, value)
        })
}
