//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **RecordService**: generic pass-through CRUD with update-or-create
//! - **AuthService**: login, password hashing, JWT tokens
//! - **UserService**: accounts and default-user protection
//! - **OrderService**: order lifecycle, history, quotation, invoice, tracking
//! - **ReportService**: summary figures
//! - **UploadService**: order photos

pub mod auth_service;
pub mod order_service;
pub mod record_service;
pub mod report_service;
pub mod upload_service;
pub mod user_service;

pub use auth_service::{AuthError, AuthService, AuthServiceImpl, Claims};
pub use order_service::OrderService;
pub use record_service::{RecordError, RecordService, Upserted};
pub use report_service::ReportService;
pub use upload_service::{IncomingPhoto, UploadService};
pub use user_service::UserService;
