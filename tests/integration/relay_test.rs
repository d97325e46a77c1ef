use super::common;

use axum::http::StatusCode;
use common::test_server::{FakeWebhook, TestServer};
use segment_builder::domain::SaveSegmentRequest;

fn vip_segment() -> SaveSegmentRequest {
    SaveSegmentRequest {
        segment_name: "VIP".to_string(),
        schemas: vec!["first_name".to_string(), "city".to_string()],
        timestamp: "2024-05-01T10:00:00Z".to_string(),
    }
}

#[tokio::test]
async fn test_segment_is_forwarded_verbatim() {
    let webhook = FakeWebhook::start(StatusCode::OK, "accepted").await;
    let server = TestServer::new(Some(webhook.url.clone())).await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/api/save-segment"))
        .json(&vip_segment())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], 200);
    assert_eq!(body["response"], "accepted");

    let received = webhook.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    let forwarded: SaveSegmentRequest = serde_json::from_value(received[0].clone()).unwrap();
    assert_eq!(forwarded, vip_segment());
}

#[tokio::test]
async fn test_webhook_rejection_is_wrapped_with_200() {
    let webhook = FakeWebhook::start(StatusCode::BAD_REQUEST, "nope").await;
    let server = TestServer::new(Some(webhook.url.clone())).await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/api/save-segment"))
        .json(&vip_segment())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 400);
    assert_eq!(body["response"], "nope");
}

#[tokio::test]
async fn test_unreachable_webhook_returns_500() {
    // Bind and drop a listener so the port is very likely closed
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let server = TestServer::new(Some(format!("http://127.0.0.1:{}/hook", port))).await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/api/save-segment"))
        .json(&vip_segment())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Failed to send webhook");
}

#[tokio::test]
async fn test_missing_webhook_returns_500() {
    let server = TestServer::new(None).await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/api/save-segment"))
        .json(&vip_segment())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
}

#[tokio::test]
async fn test_webhook_url_reload_is_picked_up() {
    let webhook = FakeWebhook::start(StatusCode::OK, "late").await;
    let server = TestServer::new(None).await;
    let client = reqwest::Client::new();

    server.settings.write().await.relay.webhook_url = Some(webhook.url.clone());

    let response = client
        .post(server.url("/api/save-segment"))
        .json(&vip_segment())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(webhook.received.lock().unwrap().len(), 1);
}
