//! REST API endpoint tests

mod auth_tests;
mod email_tests;
mod health_tests;
mod mailer_tests;
mod record_tests;
mod store_tests;
mod upload_tests;
