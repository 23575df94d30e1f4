//! User domain
//!
//! Domain types and traits for accounts: the user entity with its KYC state,
//! field validation, and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{KycStatus, User, UserId, UserSnapshot};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_password, validate_phone_number, validate_user_id,
    validate_username, UserValidationError,
};
