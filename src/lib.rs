//! # Garage Manager Library
//!
//! Backend for an automotive repair shop:
//! - Client, vehicle and service-order records kept in an external
//!   JSON-document server
//! - Order lifecycle with state history and client notifications
//! - Quotations, PDF invoices and summary reports
//! - Photo uploads and public order tracking
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Records, value objects and the store/mailer ports
//! - **Application Layer**: Services and DTOs
//! - **Infrastructure Layer**: Store backends, email, PDF, uploads, metrics
//! - **Presentation Layer**: HTTP handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! garage_manager/
//! +-- config/         Configuration management
//! +-- domain/         Entities, value objects and ports
//! +-- application/    Application services and DTOs
//! +-- infrastructure/ Store, email, PDF and upload implementations
//! +-- presentation/   HTTP routes and middleware
//! +-- shared/         Common utilities (errors, JSON helpers, validation)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
