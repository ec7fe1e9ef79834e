use crate::domain::DomainResult;

/// One-way password hashing.
///
/// Hashing is CPU-bound and short; implementations run inline on the
/// caller's task.
pub trait PasswordHasher: Send + Sync {
    fn encode(&self, plaintext: &str) -> DomainResult<String>;
}
