use serde::{Deserialize, Serialize};

/// Granted to every saved user.
pub const ROLE_USER: &str = "ROLE_USER";
/// Granted only when the admin flag is set.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// A named permission tag. Seeded by migrations, never written by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

impl Role {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
