//! Application state for shared services

use std::sync::Arc;

use crate::domain::chain::ChainHandle;
use crate::domain::user::{KycStatus, User, UserId, UserRepository};
use crate::domain::wallet::{BalanceResult, TokenBalanceResult, WalletRecord, WalletRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::services::{BalanceError, BalanceService};
use crate::infrastructure::user::{
    ChangePasswordRequest, PasswordHasher, RegisterUserRequest, UpdateProfileRequest, UserService,
};
use crate::infrastructure::wallet::WalletService;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub wallet_service: Arc<dyn WalletServiceTrait>,
    pub balance_service: Arc<dyn BalanceServiceTrait>,
    pub jwt_service: Arc<dyn JwtGenerator>,
    /// Checksummed lending contract address, when one is configured and valid
    pub lending_contract_address: Option<String>,
}

/// Trait for user account operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError>;
    async fn authenticate(&self, username: &str, password: &str)
        -> Result<Option<User>, DomainError>;
    async fn get(&self, id: &str) -> Result<Option<User>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
    async fn update_profile(
        &self,
        id: &str,
        request: UpdateProfileRequest,
    ) -> Result<User, DomainError>;
    async fn change_password(
        &self,
        id: &str,
        request: ChangePasswordRequest,
    ) -> Result<User, DomainError>;
    async fn submit_kyc(&self, id: &str) -> Result<User, DomainError>;
    async fn kyc_status(&self, id: &str) -> Result<KycStatus, DomainError>;
}

/// Trait for wallet record operations
#[async_trait::async_trait]
pub trait WalletServiceTrait: Send + Sync {
    async fn create(&self, user_id: &str, address: &str) -> Result<WalletRecord, DomainError>;
    async fn get(&self, user_id: &str) -> Result<WalletRecord, DomainError>;
    async fn update(&self, user_id: &str, address: &str) -> Result<WalletRecord, DomainError>;
    async fn delete(&self, user_id: &str) -> Result<(), DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

/// Trait for balance lookups
#[async_trait::async_trait]
pub trait BalanceServiceTrait: Send + Sync {
    async fn native_balance(
        &self,
        address: Option<&str>,
        caller: Option<&UserId>,
    ) -> Result<BalanceResult, BalanceError>;
    async fn token_balance(
        &self,
        address: Option<&str>,
        token_address: Option<&str>,
        caller: Option<&UserId>,
    ) -> Result<TokenBalanceResult, BalanceError>;
    fn chain(&self) -> &ChainHandle;
}

// Implement traits for the actual services

#[async_trait::async_trait]
impl<R: UserRepository + 'static, H: PasswordHasher + 'static> UserServiceTrait
    for UserService<R, H>
{
    async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        UserService::register(self, request).await
    }

    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        UserService::authenticate(self, username, password).await
    }

    async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserService::count(self).await
    }

    async fn update_profile(
        &self,
        id: &str,
        request: UpdateProfileRequest,
    ) -> Result<User, DomainError> {
        UserService::update_profile(self, id, request).await
    }

    async fn change_password(
        &self,
        id: &str,
        request: ChangePasswordRequest,
    ) -> Result<User, DomainError> {
        UserService::change_password(self, id, request).await
    }

    async fn submit_kyc(&self, id: &str) -> Result<User, DomainError> {
        UserService::submit_kyc(self, id).await
    }

    async fn kyc_status(&self, id: &str) -> Result<KycStatus, DomainError> {
        UserService::kyc_status(self, id).await
    }
}

#[async_trait::async_trait]
impl<R: WalletRepository + 'static> WalletServiceTrait for WalletService<R> {
    async fn create(&self, user_id: &str, address: &str) -> Result<WalletRecord, DomainError> {
        WalletService::create(self, user_id, address).await
    }

    async fn get(&self, user_id: &str) -> Result<WalletRecord, DomainError> {
        WalletService::get(self, user_id).await
    }

    async fn update(&self, user_id: &str, address: &str) -> Result<WalletRecord, DomainError> {
        WalletService::update(self, user_id, address).await
    }

    async fn delete(&self, user_id: &str) -> Result<(), DomainError> {
        WalletService::delete(self, user_id).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        WalletService::count(self).await
    }
}

#[async_trait::async_trait]
impl<W: WalletRepository + 'static, U: UserRepository + 'static> BalanceServiceTrait
    for BalanceService<W, U>
{
    async fn native_balance(
        &self,
        address: Option<&str>,
        caller: Option<&UserId>,
    ) -> Result<BalanceResult, BalanceError> {
        BalanceService::native_balance(self, address, caller).await
    }

    async fn token_balance(
        &self,
        address: Option<&str>,
        token_address: Option<&str>,
        caller: Option<&UserId>,
    ) -> Result<TokenBalanceResult, BalanceError> {
        BalanceService::token_balance(self, address, token_address, caller).await
    }

    fn chain(&self) -> &ChainHandle {
        BalanceService::chain(self)
    }
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        wallet_service: Arc<dyn WalletServiceTrait>,
        balance_service: Arc<dyn BalanceServiceTrait>,
        jwt_service: Arc<dyn JwtGenerator>,
        lending_contract_address: Option<String>,
    ) -> Self {
        Self {
            user_service,
            wallet_service,
            balance_service,
            jwt_service,
            lending_contract_address,
        }
    }

    pub fn chain(&self) -> &ChainHandle {
        self.balance_service.chain()
    }
}
