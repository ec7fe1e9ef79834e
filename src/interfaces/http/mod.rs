//! HTTP REST API interfaces
//!
//! - `common`: response envelope and error mapping
//! - `modules`: request handlers and DTOs per resource
//! - `router`: API router with the OpenAPI document

pub mod common;
pub mod modules;
pub mod router;

pub use common::{ApiError, ApiResponse};
pub use router::{create_api_router, ApiDoc, AppState};
