use axum::{http::StatusCode, routing::post, Json, Router};
use segment_builder::adapters::metrics_handler::MetricsCollector;
use segment_builder::adapters::relay_handler::WebhookRelay;
use segment_builder::config::{RelaySettings, ServerSettings, Settings};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

pub struct TestServer {
    pub addr: SocketAddr,
    pub base_url: String,
    pub settings: Arc<RwLock<Settings>>,
}

impl TestServer {
    pub async fn new(webhook_url: Option<String>) -> Self {
        let settings = Arc::new(RwLock::new(Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port
            },
            relay: RelaySettings {
                webhook_url,
                timeout_seconds: 2,
            },
            rate_limit: None,
        }));

        let metrics = Arc::new(MetricsCollector::new().unwrap());
        let relay = Arc::new(WebhookRelay::new(settings.clone()));

        let app = segment_builder::create_app(settings.clone(), relay, metrics).await;

        // Start server on random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to be ready
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestServer {
            addr,
            base_url,
            settings,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Stand-in for the outbound webhook: records bodies and answers with a fixed status
pub struct FakeWebhook {
    pub url: String,
    pub received: Arc<Mutex<Vec<Value>>>,
}

impl FakeWebhook {
    pub async fn start(status: StatusCode, reply: &'static str) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();

        let app = Router::new().route(
            "/hook",
            post(move |Json(body): Json<Value>| {
                let sink = sink.clone();
                async move {
                    sink.lock().unwrap().push(body);
                    (status, reply)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FakeWebhook {
            url: format!("http://{}/hook", addr),
            received,
        }
    }
}
