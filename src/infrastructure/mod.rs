//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;
pub mod storage;

pub use crypto::BcryptPasswordHasher;
pub use database::{init_database, DatabaseConfig, SeaOrmTransactionManager};
pub use storage::InMemoryTransactionManager;
