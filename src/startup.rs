//! Application Startup
//!
//! Application building and server initialization.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::application::services::{
    AuthServiceImpl, OrderService, RecordService, ReportService, UploadService, UserService,
};
use crate::config::Settings;
use crate::domain::{DocumentStore, Mailer};
use crate::infrastructure::{email, store};
use crate::presentation::http::{handlers, routes};
use crate::presentation::middleware::{cors, logging};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub mailer: Arc<dyn Mailer>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, mailer: Arc<dyn Mailer>, settings: Settings) -> Self {
        Self {
            store,
            mailer,
            settings: Arc::new(settings),
        }
    }

    pub fn records(&self) -> RecordService {
        RecordService::new(self.store.clone())
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.records(), self.settings.users.clone())
    }

    pub fn orders(&self) -> OrderService {
        OrderService::new(self.records(), self.mailer.clone(), self.settings.clone())
    }

    pub fn reports(&self) -> ReportService {
        ReportService::new(self.records())
    }

    pub fn uploads(&self) -> UploadService {
        UploadService::new(self.records(), &self.settings.uploads)
    }

    pub fn auth(&self) -> AuthServiceImpl {
        AuthServiceImpl::new(self.store.clone(), self.settings.jwt.clone())
    }
}

/// Router with every layer the server runs with
pub fn build_router(state: AppState) -> Router {
    let cors = cors::create_cors_layer(&state.settings.cors);
    routes::create_router(state)
        .layer(CompressionLayer::new())
        .layer(logging::create_trace_layer())
        .layer(cors)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        handlers::health::init_server_start();

        let store = store::create_store(&settings.store)?;
        tracing::info!(kind = ?settings.store.kind, url = %settings.store.url, "Document store configured");

        let mailer = email::create_mailer(&settings.email)?;

        let addr = settings.server_addr();
        let router = build_router(AppState::new(store, mailer, settings));

        // Bind to address
        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
