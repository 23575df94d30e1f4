//! User service for registration, authentication, profile and KYC

use std::sync::Arc;

use crate::domain::user::{
    validate_email, validate_password, validate_phone_number, validate_username, KycStatus, User,
    UserId, UserRepository,
};
use crate::domain::wallet::validate_address;
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Message returned when a profile wallet address fails validation
pub const INVALID_WALLET_ADDRESS: &str = "Invalid Ethereum wallet address format.";

/// Request for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub username: String,
    pub password: String,
    pub phone_number: String,
    pub email: Option<String>,
}

/// Partial profile update
///
/// The outer `Option` says whether the field was sent at all; `Some(None)`
/// clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileRequest {
    pub phone_number: Option<Option<String>>,
    pub wallet_address: Option<Option<String>>,
}

/// Request for changing a user's password
#[derive(Debug, Clone)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

/// User service for authentication and account management
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new user with KYC pending
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        validate_username(&request.username).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password).map_err(|e| DomainError::validation(e.to_string()))?;

        let phone_number = request.phone_number.trim().to_string();
        validate_phone_number(&phone_number)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let email = match request.email.map(|e| e.trim().to_string()) {
            Some(email) if !email.is_empty() => {
                validate_email(&email).map_err(|e| DomainError::validation(e.to_string()))?;
                Some(email)
            }
            _ => None,
        };

        if self.repository.username_exists(&request.username).await? {
            return Err(DomainError::conflict(
                "A user with that username already exists.",
            ));
        }

        let password_hash = self.hasher.hash(&request.password)?;

        let user = User::new(
            UserId::generate(),
            &request.username,
            password_hash,
            email,
            Some(phone_number),
        );

        self.repository.create(user).await
    }

    /// Authenticate a user with username and password
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let mut user = match self.repository.get_by_username(username).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        if !self.hasher.verify(password, user.password_hash()) {
            return Ok(None);
        }

        if self.hasher.needs_rehash(user.password_hash()) {
            user.set_password_hash(self.hasher.hash(password)?);
            self.repository.update(&user).await?;
        }

        self.repository.record_login(user.id()).await?;

        // Re-fetch user to get updated last_login_at
        self.repository.get(user.id()).await
    }

    /// Get a user by ID
    pub async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        let user_id = UserId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))?;
        self.repository.get(&user_id).await
    }

    /// Count registered users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    /// Apply a partial profile update
    ///
    /// Wallet addresses are validated and stored in checksummed form.
    pub async fn update_profile(
        &self,
        id: &str,
        request: UpdateProfileRequest,
    ) -> Result<User, DomainError> {
        let mut user = self.require(id).await?;

        if let Some(phone_number) = request.phone_number {
            let phone_number = phone_number
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty());

            if let Some(phone) = &phone_number {
                validate_phone_number(phone)
                    .map_err(|e| DomainError::validation(e.to_string()))?;
            }

            user.set_phone_number(phone_number);
        }

        if let Some(wallet_address) = request.wallet_address {
            let wallet_address = wallet_address
                .filter(|a| !a.trim().is_empty())
                .map(|a| validate_address(&a))
                .transpose()
                .map_err(|_| DomainError::validation(INVALID_WALLET_ADDRESS))?;

            user.set_wallet_address(wallet_address);
        }

        self.repository.update(&user).await
    }

    /// Change a user's password after checking the current one
    pub async fn change_password(
        &self,
        id: &str,
        request: ChangePasswordRequest,
    ) -> Result<User, DomainError> {
        if request.new_password != request.confirm_new_password {
            return Err(DomainError::validation("New passwords must match."));
        }

        let mut user = self.require(id).await?;

        if !self.hasher.verify(&request.old_password, user.password_hash()) {
            return Err(DomainError::validation("Wrong password."));
        }

        validate_password(&request.new_password)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let new_hash = self.hasher.hash(&request.new_password)?;
        user.set_password_hash(new_hash);

        self.repository.update(&user).await
    }

    /// Submit the user for KYC review
    pub async fn submit_kyc(&self, id: &str) -> Result<User, DomainError> {
        let mut user = self.require(id).await?;

        user.submit_kyc()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        self.repository.update(&user).await
    }

    /// Current KYC status of a user
    pub async fn kyc_status(&self, id: &str) -> Result<KycStatus, DomainError> {
        Ok(self.require(id).await?.kyc_status())
    }

    async fn require(&self, id: &str) -> Result<User, DomainError> {
        self.get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }
}
