//! User domain
//!
//! Domain types and traits for user authentication: the user entity,
//! validation, and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId};
pub use repository::UserRepository;
pub use validation::{
    validate_password, validate_user_id, validate_username, UserValidationError,
};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
