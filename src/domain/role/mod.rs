//! Role reference data

pub mod model;
pub mod repository;

pub use model::{Role, ROLE_ADMIN, ROLE_USER};
pub use repository::RoleStore;
