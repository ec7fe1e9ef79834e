use async_trait::async_trait;

use super::Role;
use crate::domain::DomainResult;

#[async_trait]
pub trait RoleStore: Send + Sync {
    /// `None` when no role with that name has been seeded.
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Role>>;
}
