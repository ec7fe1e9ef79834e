//! Password hashing utilities

use bcrypt::{hash, DEFAULT_COST};

use crate::domain::{DomainError, DomainResult, PasswordHasher};

/// Hash a password using bcrypt
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

/// bcrypt-backed [`PasswordHasher`]
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// `cost` must lie in bcrypt's 4..=31 range; out-of-range values fail at hash time.
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn encode(&self, plaintext: &str) -> DomainResult<String> {
        hash_password(plaintext, self.cost).map_err(|e| DomainError::Hashing(e.to_string()))
    }
}
