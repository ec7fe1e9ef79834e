//! User aggregate
//!
//! Contains the User entity, the update request shape, and the store interface.

pub mod model;
pub mod repository;

mod dto_update;

pub use model::{AdminFlag, User};

pub use dto_update::UserRequest;

pub use repository::UserStore;
