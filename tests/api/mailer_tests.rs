//! Email provider client tests against an in-process fake provider

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use garage_manager::config::EmailSettings;
use garage_manager::domain::{Collection, EmailMessage, Mailer, MailerError};
use garage_manager::infrastructure::email::HttpMailer;
use garage_manager::infrastructure::store::MemoryDocumentStore;
use garage_manager::startup::{build_router, AppState};
use tower::ServiceExt;

use crate::common::{default_users, json_body, test_settings};

const FROM: &str = "Taller <no-reply@garage.local>";

/// What the fake provider received and how it answers.
struct Provider {
    status: StatusCode,
    reply: Value,
    received: Mutex<Vec<(Option<String>, Value)>>,
}

async fn emails(
    State(provider): State<Arc<Provider>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    provider.received.lock().push((auth, body));
    (provider.status, Json(provider.reply.clone()))
}

/// Serve the provider on an ephemeral port; returns the send URL.
async fn spawn_provider(status: StatusCode, reply: Value) -> (Arc<Provider>, String) {
    let provider = Arc::new(Provider {
        status,
        reply,
        received: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/emails", post(emails))
        .with_state(provider.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (provider, format!("http://{}/emails", addr))
}

fn email_settings(api_url: &str) -> EmailSettings {
    EmailSettings {
        api_url: api_url.to_string(),
        api_key: Some("test-key".into()),
        from: FROM.into(),
        notify_state_changes: true,
    }
}

fn message() -> EmailMessage {
    EmailMessage {
        to: "ana@example.com".into(),
        subject: "Your car is ready".into(),
        html: "<p>Come by</p>".into(),
    }
}

#[tokio::test]
async fn test_http_mailer_posts_provider_payload() {
    let (provider, url) = spawn_provider(StatusCode::OK, json!({"id": "msg_123"})).await;
    let mailer = HttpMailer::new(&email_settings(&url)).unwrap();

    let id = mailer.send(&message()).await.unwrap();

    assert_eq!(id, "msg_123");
    let received = provider.received.lock();
    assert_eq!(received.len(), 1);
    let (auth, body) = &received[0];
    assert_eq!(auth.as_deref(), Some("Bearer test-key"));
    assert_eq!(
        body,
        &json!({
            "from": FROM,
            "to": ["ana@example.com"],
            "subject": "Your car is ready",
            "html": "<p>Come by</p>"
        })
    );
}

#[tokio::test]
async fn test_http_mailer_reply_without_id() {
    let (_, url) = spawn_provider(StatusCode::OK, json!({})).await;
    let mailer = HttpMailer::new(&email_settings(&url)).unwrap();

    let id = mailer.send(&message()).await.unwrap();

    assert!(uuid::Uuid::parse_str(&id).is_ok());
}

#[tokio::test]
async fn test_http_mailer_provider_rejection() {
    let (_, url) = spawn_provider(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "down"})).await;
    let mailer = HttpMailer::new(&email_settings(&url)).unwrap();

    let err = mailer.send(&message()).await.unwrap_err();

    match err {
        MailerError::Rejected { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("down"));
        }
        other => panic!("expected a rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_mailer_unreachable_provider() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let mailer = HttpMailer::new(&email_settings(&format!("http://{}/emails", addr))).unwrap();

    assert!(matches!(
        mailer.send(&message()).await,
        Err(MailerError::Transport(_))
    ));
}

/// Full router wired to the HTTP mailer.
fn app_with_provider(url: &str) -> Router {
    let store = Arc::new(MemoryDocumentStore::new());
    store.seed(Collection::Users, default_users());

    let mut settings = test_settings();
    settings.email = email_settings(url);
    let mailer = Arc::new(HttpMailer::new(&settings.email).unwrap());
    build_router(AppState::new(store, mailer, settings))
}

fn send_email_request() -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method("POST")
        .uri("/api/email")
        .header("Content-Type", "application/json")
        .body(axum::body::Body::from(
            json!({"to": "ana@example.com", "subject": "Hi", "html": "<p>Hello</p>"}).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn test_send_email_endpoint_through_provider() {
    let (provider, url) = spawn_provider(StatusCode::OK, json!({"id": "msg_123"})).await;

    let response = app_with_provider(&url).oneshot(send_email_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["id"], "msg_123");
    assert_eq!(provider.received.lock().len(), 1);
}

#[tokio::test]
async fn test_send_email_endpoint_provider_failure() {
    let (_, url) = spawn_provider(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "down"})).await;

    let response = app_with_provider(&url).oneshot(send_email_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
