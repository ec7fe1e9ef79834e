//! Cryptographic primitives

pub mod password;

pub use password::BcryptPasswordHasher;
