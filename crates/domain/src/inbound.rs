use crate::{client::ClientIdentity, shared::entity::ID};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Channel independent booking request, produced by a `ChannelAdapter`
/// from a webhook payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundBookingRequest {
    #[serde(default)]
    pub resource_id: Option<ID>,
    pub service_id: ID,
    pub client: ClientIdentity,
    pub start_ts: i64,
    pub idempotency_key: String,
}

#[derive(Error, Debug, PartialEq)]
pub enum InboundError {
    #[error("The payload could not be parsed: {0}")]
    MalformedPayload(String),
    #[error("The idempotency key must be between 1 and 200 characters")]
    InvalidIdempotencyKey,
}

impl InboundBookingRequest {
    pub fn validate(&self) -> Result<(), InboundError> {
        let key = self.idempotency_key.trim();
        if key.is_empty() || key.len() > 200 {
            return Err(InboundError::InvalidIdempotencyKey);
        }
        Ok(())
    }
}

/// Turns webhook calls of one messaging channel into `InboundBookingRequest`s
pub trait ChannelAdapter: Send + Sync {
    fn channel(&self) -> &str;

    /// Header carrying the signature or secret of the webhook call
    fn signature_header(&self) -> &str;

    fn verify_signature(&self, signature: Option<&str>, body: &[u8]) -> bool;

    fn normalize(&self, body: &[u8]) -> Result<InboundBookingRequest, InboundError>;
}

/// Accepts payloads that already have the canonical shape, authenticated by
/// a shared secret in the `x-inbound-secret` header
pub struct CanonicalJsonAdapter {
    channel: String,
    secret: String,
}

impl CanonicalJsonAdapter {
    pub fn new(channel: &str, secret: &str) -> Self {
        Self {
            channel: channel.into(),
            secret: secret.into(),
        }
    }
}

impl ChannelAdapter for CanonicalJsonAdapter {
    fn channel(&self) -> &str {
        &self.channel
    }

    fn signature_header(&self) -> &str {
        "x-inbound-secret"
    }

    fn verify_signature(&self, signature: Option<&str>, _body: &[u8]) -> bool {
        match signature {
            // Compare every byte so timing does not leak the matching prefix
            Some(signature) if signature.len() == self.secret.len() => signature
                .bytes()
                .zip(self.secret.bytes())
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0,
            _ => false,
        }
    }

    fn normalize(&self, body: &[u8]) -> Result<InboundBookingRequest, InboundError> {
        let req: InboundBookingRequest = serde_json::from_slice(body)
            .map_err(|e| InboundError::MalformedPayload(e.to_string()))?;
        req.validate()?;
        Ok(req)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_verifies_shared_secret() {
        let adapter = CanonicalJsonAdapter::new("telegram", "s3cret");
        assert!(adapter.verify_signature(Some("s3cret"), b""));
        assert!(!adapter.verify_signature(Some("s3creT"), b""));
        assert!(!adapter.verify_signature(Some("s3cre"), b""));
        assert!(!adapter.verify_signature(None, b""));
    }

    #[test]
    fn it_normalizes_canonical_payload() {
        let adapter = CanonicalJsonAdapter::new("telegram", "s3cret");
        let service_id = ID::default();
        let body = format!(
            r#"{{
                "serviceId": "{}",
                "client": {{ "name": "Kari", "channel": {{ "channel": "telegram", "userId": "991" }} }},
                "startTs": 1715353200000,
                "idempotencyKey": "update-42"
            }}"#,
            service_id
        );
        let req = adapter.normalize(body.as_bytes()).unwrap();
        assert_eq!(req.service_id, service_id);
        assert_eq!(req.resource_id, None);
        assert_eq!(req.client.name.as_deref(), Some("Kari"));
        assert_eq!(req.start_ts, 1715353200000);
    }

    #[test]
    fn it_rejects_bad_payloads() {
        let adapter = CanonicalJsonAdapter::new("telegram", "s3cret");
        assert!(matches!(
            adapter.normalize(b"{\"serviceId\": 1}"),
            Err(InboundError::MalformedPayload(_))
        ));

        let body = format!(
            r#"{{ "serviceId": "{}", "client": {{ "phone": "+47" }}, "startTs": 0, "idempotencyKey": " " }}"#,
            ID::default()
        );
        assert_eq!(
            adapter.normalize(body.as_bytes()),
            Err(InboundError::InvalidIdempotencyKey)
        );
    }
}
