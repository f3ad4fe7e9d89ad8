//! # Garage Manager
//!
//! Backend for an automotive repair shop.
//!
//! This is the application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Document store and mailer backends
//! - HTTP server

use anyhow::Result;
use tracing::info;

use garage_manager::config::Settings;
use garage_manager::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for structured logging
    garage_manager::telemetry::init_tracing();

    info!("Starting Garage Manager...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    // Build and run the application
    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
