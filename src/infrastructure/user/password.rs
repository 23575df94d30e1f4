//! Argon2 password hashing
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$...`). Rows carried over
//! from a Django user table use the `argon2$argon2id$...` layout; those verify
//! as well and are flagged for rehashing on the next successful login.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Argon2,
};
use std::fmt::Debug;

use crate::domain::DomainError;

const DJANGO_ARGON2_PREFIX: &str = "argon2$";

/// Trait for password hashing operations
pub trait PasswordHasher: Send + Sync + Debug {
    /// Hash a password
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Verify a password against a stored hash
    fn verify(&self, password: &str, hash: &str) -> bool;

    /// Whether a stored hash should be replaced after a successful verify
    fn needs_rehash(&self, _hash: &str) -> bool {
        false
    }
}

/// Argon2id hasher with the crate's default cost parameters
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }
}

/// Turn a stored hash into a PHC string the argon2 crate can parse
fn to_phc(stored: &str) -> Option<String> {
    if stored.starts_with("$argon2") {
        return Some(stored.to_string());
    }

    stored
        .strip_prefix(DJANGO_ARGON2_PREFIX)
        .filter(|rest| rest.starts_with("argon2"))
        .map(|rest| format!("${}", rest))
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Some(phc) = to_phc(hash) else {
            return false;
        };

        let Ok(parsed) = PasswordHash::new(&phc) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    fn needs_rehash(&self, hash: &str) -> bool {
        hash.starts_with(DJANGO_ARGON2_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher::new();

        let hash = hasher.hash("Str0ngPass!").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("Str0ngPass!", &hash));
        assert!(!hasher.verify("wrong_password", &hash));
        assert!(!hasher.needs_rehash(&hash));
    }

    #[test]
    fn test_salted_hashes_differ() {
        let hasher = Argon2Hasher::new();

        let first = hasher.hash("Str0ngPass!").unwrap();
        let second = hasher.hash("Str0ngPass!").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_django_layout_verifies_and_needs_rehash() {
        let hasher = Argon2Hasher::new();
        let phc = hasher.hash("Str0ngPass!").unwrap();
        let django = format!("argon2{}", phc);

        assert!(hasher.verify("Str0ngPass!", &django));
        assert!(!hasher.verify("other", &django));
        assert!(hasher.needs_rehash(&django));
    }

    #[test]
    fn test_unsupported_hashes_never_verify() {
        let hasher = Argon2Hasher::new();

        assert!(!hasher.verify("password", "pbkdf2_sha256$600000$salt$hash"));
        assert!(!hasher.verify("password", "argon2$bcrypt$oops"));
        assert!(!hasher.verify("password", ""));
    }
}
