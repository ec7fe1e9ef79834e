//! Outbound ports - collaborators the user service is constructed with
//!
//! - [`PasswordHasher`]: one-way password transformation
//! - [`TransactionManager`] / [`UnitOfWork`]: transaction-scoped access to
//!   the user and role stores

pub mod password;
pub mod unit_of_work;

pub use password::PasswordHasher;
pub use unit_of_work::{AccessMode, TransactionManager, UnitOfWork};
