//! Handler tests for the invitation endpoint
//!
//! Uses in-process providers so delivery outcomes are deterministic.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_notifications::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt; // For oneshot()

/// Records recipients; fails for any address listed in `reject`.
#[derive(Clone, Default)]
struct RecordingProvider {
    sent: Arc<Mutex<Vec<String>>>,
    reject: Vec<String>,
}

#[async_trait]
impl EmailProvider for RecordingProvider {
    async fn send(&self, email: &EmailContent) -> NotificationResult<SentEmail> {
        if self.reject.contains(&email.to_email) {
            return Err(NotificationError::ProviderError(format!(
                "550 mailbox unavailable: {}",
                email.to_email
            )));
        }
        self.sent.lock().unwrap().push(email.to_email.clone());
        Ok(SentEmail::default())
    }

    fn name(&self) -> &'static str {
        "recording"
    }

    async fn health_check(&self) -> NotificationResult<bool> {
        Ok(true)
    }
}

struct StalledProvider;

#[async_trait]
impl EmailProvider for StalledProvider {
    async fn send(&self, _email: &EmailContent) -> NotificationResult<SentEmail> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(SentEmail::default())
    }

    fn name(&self) -> &'static str {
        "stalled"
    }

    async fn health_check(&self) -> NotificationResult<bool> {
        Ok(false)
    }
}

fn config() -> InvitationConfig {
    InvitationConfig::new("http://localhost:8080/redoc")
}

fn invite(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// Helper to parse JSON response body
async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_invite_sends_to_every_address() {
    let provider = RecordingProvider::default();
    let sent = provider.sent.clone();
    let app = handlers::router(InvitationService::new(provider, config()).unwrap());

    let response = app
        .oneshot(invite(json!({"email": ["ada@example.com", "grace@example.com"]})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response.into_body()).await,
        json!({"message": "Invitation email has been sent"})
    );
    assert_eq!(*sent.lock().unwrap(), vec!["ada@example.com", "grace@example.com"]);
}

#[tokio::test]
async fn test_invite_rejects_malformed_batch_before_sending() {
    let provider = RecordingProvider::default();
    let sent = provider.sent.clone();
    let app = handlers::router(InvitationService::new(provider, config()).unwrap());

    let response = app
        .oneshot(invite(json!({"email": ["ada@example.com", "nope"]})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_invite_rejects_address_smtp_cannot_parse_before_sending() {
    let provider = RecordingProvider::default();
    let sent = provider.sent.clone();
    let app = handlers::router(InvitationService::new(provider, config()).unwrap());

    let response = app
        .oneshot(invite(json!({"email": ["ada@example.com", "a..b@example.com"]})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response.into_body()).await["error"], "VALIDATION_ERROR");
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_invite_rejects_empty_batch() {
    let app = handlers::router(InvitationService::new(RecordingProvider::default(), config()).unwrap());

    let response = app.oneshot(invite(json!({"email": []}))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_transport_failure_is_500_with_diagnostic_and_stops() {
    let provider = RecordingProvider {
        reject: vec!["grace@example.com".to_string()],
        ..Default::default()
    };
    let sent = provider.sent.clone();
    let app = handlers::router(InvitationService::new(provider, config()).unwrap());

    let response = app
        .oneshot(invite(json!({
            "email": ["ada@example.com", "grace@example.com", "linus@example.com"]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["error"], "EMAIL_DELIVERY");
    assert_eq!(
        body["message"],
        "Failed to send email: 550 mailbox unavailable: grace@example.com"
    );
    assert_eq!(*sent.lock().unwrap(), vec!["ada@example.com"]);
}

#[tokio::test(start_paused = true)]
async fn test_stalled_transport_times_out() {
    let service = InvitationService::new(
        StalledProvider,
        config().with_send_timeout(Duration::from_secs(5)),
    )
    .unwrap();
    let app = handlers::router(service);

    let response = app
        .oneshot(invite(json!({"email": ["ada@example.com"]})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response.into_body()).await["error"], "DEPENDENCY_TIMEOUT");
}
