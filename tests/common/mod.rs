//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
    Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tower::ServiceExt;

use garage_manager::config::{
    CorsSettings, EmailSettings, JwtSettings, ServerSettings, Settings, ShopSettings, StoreKind,
    StoreSettings, UploadSettings, UserSettings,
};
use garage_manager::domain::{Collection, EmailMessage, Mailer, MailerError};
use garage_manager::infrastructure::store::MemoryDocumentStore;
use garage_manager::startup::{build_router, AppState};

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-chars";

/// Mailer that keeps every message instead of sending it
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
    pub fail: bool,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<String, MailerError> {
        if self.fail {
            return Err(MailerError::Rejected {
                status: 500,
                body: "provider down".into(),
            });
        }
        let mut sent = self.sent.lock();
        sent.push(message.clone());
        Ok(format!("test-{}", sent.len()))
    }
}

/// Test application builder
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryDocumentStore>,
    pub mailer: Arc<RecordingMailer>,
    pub settings: Settings,
}

impl TestApp {
    /// Router over an in-memory store seeded with the four default accounts
    pub async fn new() -> Self {
        Self::with_mailer(RecordingMailer::default())
    }

    pub fn with_mailer(mailer: RecordingMailer) -> Self {
        let store = Arc::new(MemoryDocumentStore::new());
        store.seed(Collection::Users, default_users());

        let mailer = Arc::new(mailer);
        let settings = test_settings();
        let state = AppState::new(store.clone(), mailer.clone(), settings.clone());

        Self {
            router: build_router(state),
            store,
            mailer,
            settings,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> Response {
        self.request(Method::GET, uri, None).await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, uri: &str, body: Value) -> Response {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> Response {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn patch_json(&self, uri: &str, body: Value) -> Response {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        self.request(Method::DELETE, uri, None).await
    }

    /// Make an authenticated GET request
    pub async fn get_auth(&self, uri: &str, token: &str) -> Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Send a prepared request
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Seed a client, a vehicle and an order in the given state
    pub fn seed_order(&self, id: &str, state: &str) {
        self.store.seed(
            Collection::Clients,
            vec![json!({"id": "c1", "name": "Ana Pérez", "phone": "3001234567", "email": "ana@example.com"})],
        );
        self.store.seed(
            Collection::Vehicles,
            vec![json!({"id": "v1", "clientId": "c1", "plate": "ABC123", "brand": "Mazda", "model": "3", "year": 2019})],
        );
        self.store.seed(
            Collection::Orders,
            vec![json!({"id": id, "clientId": "c1", "vehicleId": "v1", "state": state})],
        );
    }
}

/// Read a response body as JSON
pub async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a response body as raw bytes
pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub fn default_users() -> Vec<Value> {
    vec![
        json!({"id": "1", "name": "Admin", "email": "admin@garage.local", "password": "admin123", "role": "admin"}),
        json!({"id": "2", "name": "Client", "email": "client@garage.local", "password": "client123", "role": "client"}),
        json!({"id": "3", "name": "Technician", "email": "technician@garage.local", "password": "tech123", "role": "technician"}),
        json!({"id": "4", "name": "Quality", "email": "quality@garage.local", "password": "quality123", "role": "quality"}),
    ]
}

pub fn test_settings() -> Settings {
    let upload_dir = std::env::temp_dir().join(format!("garage-it-{}", uuid::Uuid::new_v4()));

    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        store: StoreSettings {
            kind: StoreKind::Memory,
            url: "http://localhost:3001".into(),
            timeout_secs: 5,
        },
        jwt: JwtSettings {
            secret: JWT_SECRET.into(),
            expiry_minutes: 60,
        },
        cors: CorsSettings {
            allowed_origins: vec![],
        },
        email: EmailSettings {
            api_url: "http://localhost:9/emails".into(),
            api_key: None,
            from: "Taller <no-reply@garage.local>".into(),
            notify_state_changes: true,
        },
        uploads: UploadSettings {
            dir: upload_dir.to_string_lossy().into_owned(),
            public_path: "/uploads".into(),
            max_bytes: 64 * 1024,
        },
        shop: ShopSettings {
            name: "Taller Central".into(),
            address: "Calle 10 #20-30".into(),
            phone: "+57 300 000 0000".into(),
            email: "hola@taller.test".into(),
            public_url: "https://taller.test".into(),
        },
        users: UserSettings {
            protected_ids: vec!["1".into(), "2".into(), "3".into(), "4".into()],
            protected_emails: vec![
                "admin@garage.local".into(),
                "client@garage.local".into(),
                "technician@garage.local".into(),
                "quality@garage.local".into(),
            ],
        },
        environment: "test".into(),
    }
}
