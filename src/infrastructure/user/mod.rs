//! User infrastructure module
//!
//! Password hashing with Argon2, in-memory and PostgreSQL repositories, and
//! the user service behind registration, login, profile and KYC endpoints.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{
    ChangePasswordRequest, RegisterUserRequest, UpdateProfileRequest, UserService,
    INVALID_WALLET_ADDRESS,
};
