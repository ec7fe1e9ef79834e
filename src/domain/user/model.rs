use crate::domain::role::{Role, ROLE_ADMIN};

/// User model
///
/// `password` holds the plaintext on the way into `UserService::save` and
/// the one-way hash everywhere else. `admin` is an input flag that drives
/// role assignment; it is not stored as a column.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct User {
    pub id: Option<i64>,
    pub name: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub roles: Vec<Role>,
    pub admin: bool,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        lastname: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            lastname: lastname.into(),
            username: username.into(),
            email: email.into(),
            password: password.into(),
            roles: Vec::new(),
            admin: false,
        }
    }

    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.name == name)
    }

    pub fn role_names(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.name.as_str()).collect()
    }

    /// Restore the transient admin flag from the loaded role set.
    pub(crate) fn sync_admin_flag(&mut self) {
        self.admin = self.has_role(ROLE_ADMIN);
    }
}

/// Anything that carries the admin flag the role-derivation rule reads.
pub trait AdminFlag {
    fn is_admin(&self) -> bool;
}

impl AdminFlag for User {
    fn is_admin(&self) -> bool {
        self.admin
    }
}
