//! HTTP document store tests against an in-process fake document server

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use garage_manager::config::{StoreKind, StoreSettings};
use garage_manager::domain::{Collection, DocumentStore};
use garage_manager::infrastructure::store::{HttpDocumentStore, MemoryDocumentStore};
use garage_manager::startup::{build_router, AppState};

use crate::common::{default_users, json_body, test_settings, RecordingMailer};

type Backing = Arc<MemoryDocumentStore>;

fn collection(path: &str) -> Option<Collection> {
    [
        Collection::Users,
        Collection::Clients,
        Collection::Vehicles,
        Collection::Orders,
        Collection::StateHistory,
        Collection::Expenses,
        Collection::Revenues,
        Collection::Ratings,
        Collection::Reports,
    ]
    .into_iter()
    .find(|c| c.path() == path)
}

fn found(doc: Option<Value>) -> Response {
    match doc {
        Some(doc) => Json(doc).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn list(
    State(db): State<Backing>,
    Path(name): Path<String>,
    Query(filters): Query<Vec<(String, String)>>,
) -> Response {
    match collection(&name) {
        Some(c) => Json(db.list(c, &filters).await.unwrap()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn create(State(db): State<Backing>, Path(name): Path<String>, Json(doc): Json<Value>) -> Response {
    match collection(&name) {
        Some(c) => (StatusCode::CREATED, Json(db.create(c, doc).await.unwrap())).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn get_one(State(db): State<Backing>, Path((name, id)): Path<(String, String)>) -> Response {
    let Some(c) = collection(&name) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    found(db.get(c, &id).await.unwrap())
}

async fn replace(
    State(db): State<Backing>,
    Path((name, id)): Path<(String, String)>,
    Json(doc): Json<Value>,
) -> Response {
    let Some(c) = collection(&name) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    found(db.replace(c, &id, doc).await.unwrap())
}

async fn patch(
    State(db): State<Backing>,
    Path((name, id)): Path<(String, String)>,
    Json(doc): Json<Value>,
) -> Response {
    let Some(c) = collection(&name) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    found(db.patch(c, &id, doc).await.unwrap())
}

async fn remove(State(db): State<Backing>, Path((name, id)): Path<(String, String)>) -> Response {
    let Some(c) = collection(&name) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if db.delete(c, &id).await.unwrap() {
        Json(json!({})).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

/// Serve a json-server lookalike on an ephemeral port; returns its base URL.
async fn spawn_document_server(db: Backing) -> String {
    let app = Router::new()
        .route("/{collection}", get(list).post(create))
        .route(
            "/{collection}/{id}",
            get(get_one).put(replace).patch(patch).delete(remove),
        )
        .with_state(db);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn http_store(url: &str) -> HttpDocumentStore {
    HttpDocumentStore::new(&StoreSettings {
        kind: StoreKind::Http,
        url: url.to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_http_store_round_trip() {
    let db = Arc::new(MemoryDocumentStore::new());
    let store = http_store(&spawn_document_server(db.clone()).await);

    let created = store
        .create(Collection::Clients, json!({"name": "Ana", "phone": "300"}))
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    assert_eq!(store.get(Collection::Clients, &id).await.unwrap(), Some(created));
    assert_eq!(store.get(Collection::Clients, "missing").await.unwrap(), None);

    let replaced = store
        .replace(Collection::Clients, &id, json!({"name": "Ana P.", "phone": "301"}))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replaced["name"], "Ana P.");
    assert!(store
        .replace(Collection::Clients, "missing", json!({"name": "x"}))
        .await
        .unwrap()
        .is_none());

    let patched = store
        .patch(Collection::Clients, &id, json!({"email": "ana@example.com"}))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(patched["phone"], "301");
    assert_eq!(patched["email"], "ana@example.com");

    assert!(store.delete(Collection::Clients, &id).await.unwrap());
    assert!(!store.delete(Collection::Clients, &id).await.unwrap());
}

#[tokio::test]
async fn test_http_store_forwards_filters() {
    let db = Arc::new(MemoryDocumentStore::new());
    db.seed(
        Collection::Vehicles,
        vec![
            json!({"id": "1", "clientId": "7", "plate": "ABC123"}),
            json!({"id": "2", "clientId": "8", "plate": "XYZ987"}),
        ],
    );
    let store = http_store(&spawn_document_server(db).await);

    let filters = vec![("clientId".to_string(), "8".to_string())];
    let owned = store.list(Collection::Vehicles, &filters).await.unwrap();

    assert_eq!(owned, vec![json!({"id": "2", "clientId": "8", "plate": "XYZ987"})]);
    assert!(store.ping().await.is_ok());
}

#[tokio::test]
async fn test_http_store_unreachable_server() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = http_store(&format!("http://{}", addr));

    assert!(store.ping().await.is_err());
    assert!(store.list(Collection::Orders, &[]).await.is_err());
}

#[tokio::test]
async fn test_api_over_http_store() {
    let db = Arc::new(MemoryDocumentStore::new());
    db.seed(Collection::Users, default_users());
    let store = Arc::new(http_store(&spawn_document_server(db.clone()).await));
    let router = build_router(AppState::new(
        store,
        Arc::new(RecordingMailer::default()),
        test_settings(),
    ));

    let response = tower::ServiceExt::oneshot(
        router.clone(),
        axum::http::Request::builder()
            .method("PUT")
            .uri("/api/orders/31")
            .header("Content-Type", "application/json")
            .body(axum::body::Body::from(
                json!({"clientId": "c1", "vehicleId": "v1"}).to_string(),
            ))
            .unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json_body(response).await["id"], "31");

    let stored = db.get(Collection::Orders, "31").await.unwrap().unwrap();
    assert_eq!(stored["state"], "reception");
    let history = db
        .list(Collection::StateHistory, &[("orderId".to_string(), "31".to_string())])
        .await
        .unwrap();
    assert_eq!(history.len(), 1);

    let response = tower::ServiceExt::oneshot(
        router,
        axum::http::Request::builder()
            .uri("/health/ready")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_fails_when_store_is_down() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let router = build_router(AppState::new(
        Arc::new(http_store(&format!("http://{}", addr))),
        Arc::new(RecordingMailer::default()),
        test_settings(),
    ));

    let response = tower::ServiceExt::oneshot(
        router,
        axum::http::Request::builder()
            .uri("/health/ready")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body(response).await["status"], "unhealthy");
}
