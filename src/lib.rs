//! # Users Backend
//!
//! User management service: CRUD over users with role assignment and
//! bcrypt password hashing, persisted through SeaORM.
//!
//! ## Architecture
//!
//! - **domain**: User and Role models, store traits, hashing and transaction ports
//! - **application**: `UserService` use cases
//! - **infrastructure**: SeaORM store, in-memory store, bcrypt hasher
//! - **interfaces**: REST API with an OpenAPI document
//! - **shared**: error and pagination types

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{config_path, default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmTransactionManager};

// Re-export API router
pub use interfaces::http::{create_api_router, AppState};
