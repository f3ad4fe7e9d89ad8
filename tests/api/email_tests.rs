//! Email API Tests

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{json_body, RecordingMailer, TestApp};

#[tokio::test]
async fn test_send_email() {
    let app = TestApp::new().await;

    let response = app
        .post_json(
            "/api/email",
            json!({"to": "ana@example.com", "subject": "Your car is ready", "html": "<p>Come by</p>"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["message"], "Email sent");
    assert_eq!(json["id"], "test-1");

    let sent = app.mailer.sent.lock();
    assert_eq!(sent[0].to, "ana@example.com");
    assert_eq!(sent[0].html, "<p>Come by</p>");
}

#[tokio::test]
async fn test_send_email_accepts_content_field() {
    let app = TestApp::new().await;

    let response = app
        .post_json(
            "/api/email",
            json!({"to": "ana@example.com", "subject": "Hi", "content": "<p>Hello</p>"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.mailer.sent.lock()[0].html, "<p>Hello</p>");
}

#[tokio::test]
async fn test_send_email_without_recipient() {
    let app = TestApp::new().await;

    let response = app
        .post_json("/api/email", json!({"subject": "Hi", "html": "<p>Hello</p>"}))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.mailer.sent.lock().is_empty());
}

#[tokio::test]
async fn test_send_email_provider_failure() {
    let app = TestApp::with_mailer(RecordingMailer {
        fail: true,
        ..Default::default()
    });

    let response = app
        .post_json(
            "/api/email",
            json!({"to": "ana@example.com", "subject": "Hi", "html": "<p>Hello</p>"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
