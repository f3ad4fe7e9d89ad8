//! Authentication API Tests

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{json_body, TestApp};

async fn login(app: &TestApp, email: &str, password: &str) -> axum::response::Response {
    app.post_json("/api/auth/login", json!({"email": email, "password": password}))
        .await
}

#[tokio::test]
async fn test_login_with_default_account() {
    let app = TestApp::new().await;

    let response = login(&app, "admin@garage.local", "admin123").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(json["tokenType"], "Bearer");
    assert_eq!(json["user"]["email"], "admin@garage.local");
    assert!(json["user"].get("password").is_none());
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let app = TestApp::new().await;

    let response = login(&app, "Technician@Garage.Local", "tech123").await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = TestApp::new().await;

    let response = login(&app, "admin@garage.local", "nope").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_with_unknown_email() {
    let app = TestApp::new().await;

    let response = login(&app, "ghost@garage.local", "admin123").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let app = TestApp::new().await;

    let response = app
        .post_json("/api/auth/login", json!({"email": "admin@garage.local"}))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["field"] == "password"));
}

#[tokio::test]
async fn test_me_returns_token_owner() {
    let app = TestApp::new().await;
    let token = json_body(login(&app, "quality@garage.local", "quality123").await).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app.get_auth("/api/auth/me", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["id"], "4");
    assert_eq!(json["role"], "quality");
    assert!(json.get("password").is_none());
}

#[tokio::test]
async fn test_me_without_token() {
    let app = TestApp::new().await;

    let response = app.get("/api/auth/me").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_garbage_token() {
    let app = TestApp::new().await;

    let response = app.get_auth("/api/auth/me", "not.a.jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
