use super::AdminFlag;

/// Editable user fields. Carries neither an id nor a password.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserRequest {
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub username: String,
    pub admin: bool,
}

impl AdminFlag for UserRequest {
    fn is_admin(&self) -> bool {
        self.admin
    }
}
