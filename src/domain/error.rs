//! Relay error types

use thiserror::Error;

/// Errors that stop a segment from reaching the webhook
#[derive(Debug, Error)]
pub enum RelayError {
    /// No webhook URL has been configured
    #[error("Webhook URL is not configured")]
    NotConfigured,

    /// The request body was not JSON
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// Connection, timeout or protocol failure talking to the webhook
    #[error("Webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl RelayError {
    /// Label used for the relay outcome metric
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotConfigured => "not_configured",
            Self::InvalidBody(_) => "invalid_body",
            Self::Transport(_) => "transport",
        }
    }
}
