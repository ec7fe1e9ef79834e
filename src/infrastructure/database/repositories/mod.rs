//! Database repository implementations
//!
//! Query functions are generic over `ConnectionTrait` so they run against a
//! `DatabaseTransaction`; `SeaOrmUnitOfWork` binds them to one transaction.

pub mod role_repository;
pub mod unit_of_work;
pub mod user_repository;

pub use unit_of_work::{SeaOrmTransactionManager, SeaOrmUnitOfWork};

use sea_orm::{DbErr, SqlErr};

use crate::domain::DomainError;

/// Unique-key violations become `Conflict`; everything else is a storage failure.
pub(crate) fn db_err(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => DomainError::Conflict(detail),
        _ => DomainError::Storage(e.to_string()),
    }
}
