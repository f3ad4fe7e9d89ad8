//! HTTP API
//!
//! Routes, handlers and extractors of the JSON API.

pub mod extractors;
pub mod handlers;
pub mod routes;
