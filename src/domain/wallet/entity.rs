//! Wallet record entity and balance value objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::address::EthAddress;
use crate::domain::user::UserId;

/// One-to-one link between an application user and an on-chain address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletRecord {
    user_id: UserId,
    address: EthAddress,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WalletRecord {
    /// Link a validated address to a user
    pub fn new(user_id: UserId, address: EthAddress) -> Self {
        let now = Utc::now();

        Self {
            user_id,
            address,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a record from persisted state
    pub fn restore(
        user_id: UserId,
        address: EthAddress,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            address,
            created_at,
            updated_at,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn address(&self) -> &EthAddress {
        &self.address
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Point the record at a different address
    pub fn set_address(&mut self, address: EthAddress) {
        self.address = address;
        self.updated_at = Utc::now();
    }
}

/// Native-coin balance of an address, formatted in the major unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResult {
    pub wallet_address: String,
    pub balance: String,
}

/// ERC-20 balance of an address, formatted with the token's decimals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalanceResult {
    pub wallet_address: String,
    pub token_address: String,
    pub symbol: String,
    pub balance: String,
}
