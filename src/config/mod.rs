//! # Configuration Module
//!
//! This module handles application configuration loading and management.
//! Configuration can be loaded from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default.toml, config/{environment}.toml)
//! - .env files (via dotenvy)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use garage_manager::config::Settings;
//!
//! let settings = Settings::load()?;
//! println!("Proxying records to {}", settings.store.url);
//! ```

mod settings;

pub use settings::*;
