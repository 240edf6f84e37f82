use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub id: ID,
    pub tenant_id: ID,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub channel: Option<ChannelIdentity>,
}

/// Identity of a client on some messaging channel, e.g. a telegram chat id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelIdentity {
    pub channel: String,
    pub user_id: String,
}

/// How a booking request identifies the client. At least one of
/// `phone` and `channel` must be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientIdentity {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub channel: Option<ChannelIdentity>,
}

impl ClientIdentity {
    pub fn is_valid(&self) -> bool {
        let phone_ok = self
            .phone
            .as_ref()
            .map(|p| !p.trim().is_empty())
            .unwrap_or(false);
        let channel_ok = self
            .channel
            .as_ref()
            .map(|c| !c.channel.is_empty() && !c.user_id.is_empty())
            .unwrap_or(false);
        phone_ok || channel_ok
    }
}

impl Client {
    pub fn new(tenant_id: ID, identity: &ClientIdentity) -> Self {
        Self {
            id: Default::default(),
            tenant_id,
            name: identity.name.clone(),
            phone: identity.phone.as_ref().map(|p| p.trim().to_string()),
            channel: identity.channel.clone(),
        }
    }

    /// Whether this client is the one described by the identity, by phone or channel
    pub fn matches(&self, identity: &ClientIdentity) -> bool {
        let by_phone = match (&self.phone, &identity.phone) {
            (Some(phone), Some(other)) => phone == other.trim(),
            _ => false,
        };
        let by_channel = match (&self.channel, &identity.channel) {
            (Some(channel), Some(other)) => channel == other,
            _ => false,
        };
        by_phone || by_channel
    }

    /// Stable number used for template variant assignment
    pub fn assignment_key(&self) -> u64 {
        self.id.as_u64()
    }
}

impl Entity for Client {
    fn id(&self) -> &ID {
        &self.id
    }
}
