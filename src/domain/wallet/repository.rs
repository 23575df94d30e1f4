//! Wallet record repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::address::EthAddress;
use super::entity::WalletRecord;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository trait for wallet record storage
///
/// Implementations enforce one record per user and one record per address,
/// returning `DomainError::Conflict` on violation.
#[async_trait]
pub trait WalletRepository: Send + Sync + Debug {
    /// Get the wallet record linked to a user
    async fn get_by_user(&self, user_id: &UserId) -> Result<Option<WalletRecord>, DomainError>;

    /// Create a new record
    async fn create(&self, record: WalletRecord) -> Result<WalletRecord, DomainError>;

    /// Update an existing record
    async fn update(&self, record: &WalletRecord) -> Result<WalletRecord, DomainError>;

    /// Delete the record linked to a user
    async fn delete(&self, user_id: &UserId) -> Result<bool, DomainError>;

    /// Count stored records
    async fn count(&self) -> Result<usize, DomainError>;
}
