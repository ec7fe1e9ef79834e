//! Explicit transaction scope
//!
//! A [`UnitOfWork`] is acquired from a [`TransactionManager`] and must end in
//! exactly one of `commit` or `rollback`. Dropping a unit without committing
//! discards its writes, so an early `?` return can never publish partial state.

use async_trait::async_trait;

use crate::domain::{DomainResult, RoleStore, UserStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
}

#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> &dyn UserStore;
    fn roles(&self) -> &dyn RoleStore;

    async fn commit(self) -> DomainResult<()>;
    async fn rollback(self) -> DomainResult<()>;
}

#[async_trait]
pub trait TransactionManager: Send + Sync {
    type Unit: UnitOfWork;

    async fn begin(&self, mode: AccessMode) -> DomainResult<Self::Unit>;
}
