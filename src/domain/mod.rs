//! Domain layer - entities, store traits and collaborator ports
//!
//! - **user**: User aggregate, update request, `UserStore`
//! - **role**: Role reference data, `RoleStore`
//! - **ports**: password hashing and transaction scope

pub mod ports;
pub mod role;
pub mod user;

pub use ports::{AccessMode, PasswordHasher, TransactionManager, UnitOfWork};
pub use role::{Role, RoleStore, ROLE_ADMIN, ROLE_USER};
pub use user::{AdminFlag, User, UserRequest, UserStore};

// Re-export error types from shared for convenience
pub use crate::shared::{DomainError, DomainResult};
