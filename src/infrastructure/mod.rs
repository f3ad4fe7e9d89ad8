//! Infrastructure Layer
//!
//! Implementations of the domain ports and other outside-world concerns:
//! - Document store backends (HTTP json-document server, in-memory)
//! - Email delivery (provider HTTP API, log-only)
//! - Invoice PDF rendering
//! - Photo storage on disk
//! - Prometheus metrics

pub mod email;
pub mod metrics;
pub mod pdf;
pub mod store;
pub mod uploads;
