//! Health module - liveness and database reachability

pub mod handlers;

pub use handlers::*;
