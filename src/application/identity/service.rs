//! User management service - application-layer orchestration
//!
//! All user-related business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.
//!
//! Every public operation runs inside one unit of work: reads in
//! read-only mode, writes in read-write mode. The unit is committed when
//! the operation succeeds and rolled back otherwise.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::roles::derive_roles;
use crate::domain::{
    AccessMode, DomainResult, PasswordHasher, TransactionManager, UnitOfWork, User, UserRequest,
};
use crate::shared::{Page, PageRequest};

/// User service - orchestrates all user-management use-cases.
///
/// Generic over the transaction manager and hasher so it stays decoupled
/// from the concrete persistence layer.
pub struct UserService<T: TransactionManager, H: PasswordHasher> {
    transactions: Arc<T>,
    hasher: Arc<H>,
}

impl<T: TransactionManager, H: PasswordHasher> UserService<T, H> {
    pub fn new(transactions: Arc<T>, hasher: Arc<H>) -> Self {
        Self {
            transactions,
            hasher,
        }
    }

    // ── Queries ─────────────────────────────────────────────────

    /// All users, in store order.
    pub async fn find_all(&self) -> DomainResult<Vec<User>> {
        let unit = self.transactions.begin(AccessMode::ReadOnly).await?;
        let result = unit.users().find_all().await;
        finish(unit, result).await
    }

    /// One page of users. A page past the end comes back empty.
    pub async fn find_page(&self, request: &PageRequest) -> DomainResult<Page<User>> {
        let unit = self.transactions.begin(AccessMode::ReadOnly).await?;
        let result = unit.users().find_page(request).await;
        finish(unit, result).await
    }

    pub async fn find_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        let unit = self.transactions.begin(AccessMode::ReadOnly).await?;
        let result = unit.users().find_by_id(id).await;
        finish(unit, result).await
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Assign roles from the admin flag, hash the plaintext password and persist.
    pub async fn save(&self, user: User) -> DomainResult<User> {
        let unit = self.transactions.begin(AccessMode::ReadWrite).await?;
        let result = self.save_in(&unit, user).await;
        let saved = finish(unit, result).await?;

        info!(
            user_id = ?saved.id,
            username = %saved.username,
            roles = ?saved.role_names(),
            "User saved"
        );
        Ok(saved)
    }

    /// Overwrite the profile fields and recompute roles. The stored password
    /// hash is kept. Returns `None` without writing when `id` is unknown.
    ///
    /// The admin flag on the request is trusted as given.
    pub async fn update(&self, request: &UserRequest, id: i64) -> DomainResult<Option<User>> {
        let unit = self.transactions.begin(AccessMode::ReadWrite).await?;
        let result = self.update_in(&unit, request, id).await;
        let updated = finish(unit, result).await?;

        match &updated {
            Some(user) => info!(
                user_id = id,
                username = %user.username,
                roles = ?user.role_names(),
                "User updated"
            ),
            None => debug!(user_id = id, "Update skipped, user not found"),
        }
        Ok(updated)
    }

    /// Deleting an unknown id is not an error.
    pub async fn delete_by_id(&self, id: i64) -> DomainResult<()> {
        let unit = self.transactions.begin(AccessMode::ReadWrite).await?;
        let result = unit.users().delete_by_id(id).await;
        finish(unit, result).await?;

        info!(user_id = id, "User deleted");
        Ok(())
    }

    async fn save_in(&self, unit: &T::Unit, mut user: User) -> DomainResult<User> {
        user.roles = derive_roles(unit.roles(), &user).await?;
        user.password = self.hasher.encode(&user.password)?;
        unit.users().save(user).await
    }

    async fn update_in(
        &self,
        unit: &T::Unit,
        request: &UserRequest,
        id: i64,
    ) -> DomainResult<Option<User>> {
        let Some(mut user) = unit.users().find_by_id(id).await? else {
            return Ok(None);
        };

        user.name = request.name.clone();
        user.lastname = request.lastname.clone();
        user.email = request.email.clone();
        user.username = request.username.clone();
        user.roles = derive_roles(unit.roles(), request).await?;
        user.admin = request.admin;

        unit.users().save(user).await.map(Some)
    }
}

/// Commit on success, roll back on failure. A failed rollback is logged and
/// the operation's error is returned.
async fn finish<U: UnitOfWork, R>(unit: U, result: DomainResult<R>) -> DomainResult<R> {
    match result {
        Ok(value) => {
            unit.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = unit.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            Err(e)
        }
    }
}
