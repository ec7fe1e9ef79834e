//! Shared HTTP types

pub mod api_response;

pub use api_response::{domain_error, not_found, ApiError, ApiResponse};
