//! In-memory wallet record repository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::UserId;
use crate::domain::wallet::{EthAddress, WalletRecord, WalletRepository};
use crate::domain::DomainError;

/// In-memory implementation of WalletRepository, keyed by user ID
#[derive(Debug, Default)]
pub struct InMemoryWalletRepository {
    records: Arc<RwLock<HashMap<String, WalletRecord>>>,
}

impl InMemoryWalletRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn address_taken(
    records: &HashMap<String, WalletRecord>,
    record: &WalletRecord,
) -> Result<(), DomainError> {
    let taken = records
        .values()
        .any(|r| r.address() == record.address() && r.user_id() != record.user_id());

    if taken {
        return Err(DomainError::conflict(
            "This wallet address is already linked to another user.",
        ));
    }

    Ok(())
}

#[async_trait]
impl WalletRepository for InMemoryWalletRepository {
    async fn get_by_user(&self, user_id: &UserId) -> Result<Option<WalletRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(user_id.as_str()).cloned())
    }

    async fn create(&self, record: WalletRecord) -> Result<WalletRecord, DomainError> {
        let mut records = self.records.write().await;
        let key = record.user_id().as_str().to_string();

        if records.contains_key(&key) {
            return Err(DomainError::conflict(format!(
                "User '{}' already has a wallet record",
                key
            )));
        }

        address_taken(&records, &record)?;

        records.insert(key, record.clone());
        Ok(record)
    }

    async fn update(&self, record: &WalletRecord) -> Result<WalletRecord, DomainError> {
        let mut records = self.records.write().await;
        let key = record.user_id().as_str().to_string();

        if !records.contains_key(&key) {
            return Err(DomainError::not_found(format!(
                "No wallet record for user '{}'",
                key
            )));
        }

        address_taken(&records, record)?;

        records.insert(key, record.clone());
        Ok(record.clone())
    }

    async fn delete(&self, user_id: &UserId) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        Ok(records.remove(user_id.as_str()).is_some())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.records.read().await.len())
    }
}
