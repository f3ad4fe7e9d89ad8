//! Data Transfer Objects
//!
//! DTOs for API request/response serialization.

pub mod request;
pub mod response;

pub use request::{EmailRequest, LoginRequest, StateTransitionRequest};
pub use response::{
    EmailSentResponse, LoginResponse, QuotationLine, QuotationResponse, ReportSummary,
    ShareLinkResponse, TrackingEntry, TrackingResponse, TrackingVehicle, UploadResponse,
};
