use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod error;

pub use error::RelayError;

/// Body the UI posts to `/api/save-segment`.
///
/// The relay forwards whatever JSON it receives; this type documents the
/// shape the UI sends and is used by tests.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaveSegmentRequest {
    pub segment_name: String,
    pub schemas: Vec<String>,
    /// RFC 3339 time the UI built the request
    pub timestamp: String,
}

/// What the webhook answered with, whatever its status.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookReply {
    pub status: u16,
    pub body: String,
}

impl WebhookReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Relay response for any outcome where the webhook was reached.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RelayResponse {
    pub success: bool,
    pub status: u16,
    pub response: String,
}

impl From<WebhookReply> for RelayResponse {
    fn from(reply: WebhookReply) -> Self {
        Self {
            success: reply.is_success(),
            status: reply.status,
            response: reply.body,
        }
    }
}

/// Relay response when forwarding itself failed.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RelayFailure {
    pub success: bool,
    pub error: String,
}

impl RelayFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Outbound side of the relay: delivers a JSON body to the configured webhook.
#[async_trait]
pub trait RelayPort: Send + Sync {
    async fn forward(&self, body: &Value) -> Result<WebhookReply, RelayError>;
}
