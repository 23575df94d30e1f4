//! Wallet record service

use std::sync::Arc;

use crate::domain::user::UserId;
use crate::domain::wallet::{validate_address, EthAddress, WalletRecord, WalletRepository};
use crate::domain::DomainError;
use crate::infrastructure::user::INVALID_WALLET_ADDRESS;

pub const WALLET_ALREADY_SET: &str =
    "User already has a wallet address set. Use update endpoint instead.";
pub const WALLET_NOT_SET: &str = "Wallet address not set for this user.";

/// CRUD over a user's single wallet record
#[derive(Debug)]
pub struct WalletService<R: WalletRepository> {
    repository: Arc<R>,
}

impl<R: WalletRepository> WalletService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Link a wallet to a user that has none yet
    pub async fn create(&self, user_id: &str, address: &str) -> Result<WalletRecord, DomainError> {
        let user_id = parse_user_id(user_id)?;
        let address = parse_address(address)?;

        if self.repository.get_by_user(&user_id).await?.is_some() {
            return Err(DomainError::validation(WALLET_ALREADY_SET));
        }

        self.repository
            .create(WalletRecord::new(user_id, address))
            .await
    }

    /// The user's wallet record, if any
    pub async fn find(&self, user_id: &str) -> Result<Option<WalletRecord>, DomainError> {
        let user_id = parse_user_id(user_id)?;
        self.repository.get_by_user(&user_id).await
    }

    /// The user's wallet record, or not-found
    pub async fn get(&self, user_id: &str) -> Result<WalletRecord, DomainError> {
        self.find(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(WALLET_NOT_SET))
    }

    /// Point the user's existing record at another address
    pub async fn update(&self, user_id: &str, address: &str) -> Result<WalletRecord, DomainError> {
        let address = parse_address(address)?;
        let mut record = self.get(user_id).await?;

        record.set_address(address);
        self.repository.update(&record).await
    }

    /// Remove the user's wallet record
    pub async fn delete(&self, user_id: &str) -> Result<(), DomainError> {
        let user_id = parse_user_id(user_id)?;

        if self.repository.delete(&user_id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found(WALLET_NOT_SET))
        }
    }

    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}

fn parse_user_id(user_id: &str) -> Result<UserId, DomainError> {
    UserId::new(user_id).map_err(|e| DomainError::invalid_id(e.to_string()))
}

fn parse_address(address: &str) -> Result<EthAddress, DomainError> {
    validate_address(address).map_err(|_| DomainError::validation(INVALID_WALLET_ADDRESS))
}
