//! Role derivation
//!
//! Maps the admin flag to the role set a user is saved with:
//! `ROLE_USER` always, `ROLE_ADMIN` only for admins. A role that has not
//! been seeded is skipped rather than reported.

use tracing::debug;

use crate::domain::{AdminFlag, DomainResult, Role, RoleStore, ROLE_ADMIN, ROLE_USER};

/// Returns `[ROLE_USER?, ROLE_ADMIN?]` in that order.
pub async fn derive_roles<F>(roles: &dyn RoleStore, subject: &F) -> DomainResult<Vec<Role>>
where
    F: AdminFlag + Sync + ?Sized,
{
    let mut assigned = Vec::with_capacity(2);

    push_if_seeded(roles, ROLE_USER, &mut assigned).await?;

    if subject.is_admin() {
        push_if_seeded(roles, ROLE_ADMIN, &mut assigned).await?;
    }

    Ok(assigned)
}

async fn push_if_seeded(
    roles: &dyn RoleStore,
    name: &str,
    assigned: &mut Vec<Role>,
) -> DomainResult<()> {
    match roles.find_by_name(name).await? {
        Some(role) => assigned.push(role),
        None => debug!(role = name, "Role not seeded, skipping"),
    }
    Ok(())
}
