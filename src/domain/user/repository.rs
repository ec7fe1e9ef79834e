use async_trait::async_trait;

use super::User;
use crate::domain::DomainResult;
use crate::shared::{Page, PageRequest};

/// Persistence contract for users. Implementations are scoped to one
/// unit of work; see [`crate::domain::ports::UnitOfWork`].
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_all(&self) -> DomainResult<Vec<User>>;
    async fn find_page(&self, request: &PageRequest) -> DomainResult<Page<User>>;
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<User>>;

    /// Insert when `user.id` is `None`, otherwise overwrite the stored row
    /// and its role links. Returns the user as persisted.
    async fn save(&self, user: User) -> DomainResult<User>;

    /// Deleting an id that does not exist is a no-op.
    async fn delete_by_id(&self, id: i64) -> DomainResult<()>;
}
