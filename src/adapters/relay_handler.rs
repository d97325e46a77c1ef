//! Segment relay
//!
//! `POST /api/save-segment` forwards the posted JSON to the configured webhook
//! and wraps whatever comes back, so the webhook URL never reaches the browser.

use async_trait::async_trait;
use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::adapters::metrics_handler::MetricsCollector;
use crate::config::Settings;
use crate::domain::{RelayError, RelayFailure, RelayPort, RelayResponse, WebhookReply};

/// Message returned to the UI whenever forwarding fails
pub const RELAY_FAILURE_MESSAGE: &str = "Failed to send webhook";

/// Forwards segments to the webhook named in the live settings.
pub struct WebhookRelay {
    client: reqwest::Client,
    settings: Arc<RwLock<Settings>>,
}

impl WebhookRelay {
    pub fn new(settings: Arc<RwLock<Settings>>) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }
}

#[async_trait]
impl RelayPort for WebhookRelay {
    async fn forward(&self, body: &Value) -> Result<WebhookReply, RelayError> {
        // Read per call so a config reload takes effect without a restart
        let (url, timeout) = {
            let settings = self.settings.read().await;
            let url = settings
                .relay
                .webhook_url
                .clone()
                .filter(|url| !url.trim().is_empty())
                .ok_or(RelayError::NotConfigured)?;
            (url, Duration::from_secs(settings.relay.timeout_seconds))
        };

        let response = self
            .client
            .post(&url)
            .timeout(timeout)
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(WebhookReply { status, body })
    }
}

/// Shared state for the relay route
#[derive(Clone)]
pub struct RelayState {
    pub relay: Arc<dyn RelayPort>,
    pub metrics: Arc<MetricsCollector>,
}

/// Handler for `POST /api/save-segment`
pub async fn save_segment(State(state): State<RelayState>, body: Bytes) -> impl IntoResponse {
    let started = Instant::now();

    let result = match serde_json::from_slice::<Value>(&body) {
        Ok(payload) => {
            let segment_name = payload
                .get("segmentName")
                .and_then(Value::as_str)
                .unwrap_or("<unnamed>")
                .to_string();
            info!("Relaying segment '{}' to webhook", segment_name);
            state.relay.forward(&payload).await
        }
        Err(e) => Err(RelayError::from(e)),
    };

    let elapsed = started.elapsed().as_secs_f64();

    match result {
        Ok(reply) => {
            let outcome = if reply.is_success() { "delivered" } else { "rejected" };
            if !reply.is_success() {
                warn!("Webhook answered with status {}", reply.status);
            }
            state.metrics.record_relay(outcome, elapsed);
            (StatusCode::OK, Json(RelayResponse::from(reply))).into_response()
        }
        Err(e) => {
            error!("Error in /api/save-segment: {}", e);
            state.metrics.record_relay(e.kind(), elapsed);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RelayFailure::new(RELAY_FAILURE_MESSAGE)),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RelaySettings, ServerSettings};
    use axum::{body::Body, http::Request, routing::post, Router};
    use std::sync::Mutex;
    use tower::util::ServiceExt;

    /// Records what it was asked to forward and answers with a canned result
    struct FakeRelay {
        reply: Result<WebhookReply, ()>,
        seen: Mutex<Vec<Value>>,
    }

    #[async_trait]
    impl RelayPort for FakeRelay {
        async fn forward(&self, body: &Value) -> Result<WebhookReply, RelayError> {
            self.seen.lock().unwrap().push(body.clone());
            self.reply.clone().map_err(|_| RelayError::NotConfigured)
        }
    }

    fn app(relay: Arc<FakeRelay>) -> Router {
        let state = RelayState {
            relay,
            metrics: Arc::new(MetricsCollector::new().unwrap()),
        };
        Router::new()
            .route("/api/save-segment", post(save_segment))
            .with_state(state)
    }

    async fn post_body(app: Router, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri("/api/save-segment")
            .method("POST")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_successful_forward_is_wrapped() {
        let relay = Arc::new(FakeRelay {
            reply: Ok(WebhookReply {
                status: 200,
                body: "ok".to_string(),
            }),
            seen: Mutex::new(vec![]),
        });

        let (status, body) = post_body(
            app(relay.clone()),
            r#"{"segmentName":"VIP","schemas":["first_name","city"],"timestamp":"2024-01-01T00:00:00Z"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["status"], 200);
        assert_eq!(body["response"], "ok");

        let seen = relay.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0]["schemas"][1], "city");
    }

    #[tokio::test]
    async fn test_webhook_error_status_is_not_success() {
        let relay = Arc::new(FakeRelay {
            reply: Ok(WebhookReply {
                status: 502,
                body: "bad gateway".to_string(),
            }),
            seen: Mutex::new(vec![]),
        });

        let (status, body) = post_body(app(relay), r#"{"segmentName":"x","schemas":[]}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["status"], 502);
    }

    #[tokio::test]
    async fn test_forward_failure_returns_500() {
        let relay = Arc::new(FakeRelay {
            reply: Err(()),
            seen: Mutex::new(vec![]),
        });

        let (status, body) = post_body(app(relay), r#"{"segmentName":"x"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], RELAY_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_non_json_body_is_a_failure() {
        let relay = Arc::new(FakeRelay {
            reply: Ok(WebhookReply {
                status: 200,
                body: String::new(),
            }),
            seen: Mutex::new(vec![]),
        });

        let (status, body) = post_body(app(relay.clone()), "not json").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert!(relay.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_relay_without_url_is_not_configured() {
        let settings = Arc::new(RwLock::new(Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            relay: RelaySettings::default(),
            rate_limit: None,
        }));
        let relay = WebhookRelay::new(settings);

        let err = relay.forward(&serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, RelayError::NotConfigured));
    }
}
