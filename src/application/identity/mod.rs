//! Identity module - user management
//!
//! Contains the `UserService` which orchestrates the user use-cases:
//! listing, lookup, save with role assignment and password hashing,
//! profile updates and deletion.

pub mod roles;
pub mod service;

pub use roles::derive_roles;
pub use service::UserService;
