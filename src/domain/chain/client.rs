//! Chain client trait

use alloy_primitives::U256;
use async_trait::async_trait;

use super::error::ChainError;
use crate::domain::wallet::EthAddress;

#[cfg(test)]
use mockall::automock;

/// ERC-20 holding of an owner, in the token's smallest unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBalance {
    pub symbol: String,
    pub decimals: u8,
    pub amount: U256,
}

/// Read-only queries against an EVM node
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Native-coin balance at the latest block, in wei
    async fn native_balance(&self, address: &EthAddress) -> Result<U256, ChainError>;

    /// ERC-20 balance, decimals and symbol of `owner` on `token`
    async fn token_balance(
        &self,
        owner: &EthAddress,
        token: &EthAddress,
    ) -> Result<TokenBalance, ChainError>;

    /// Chain id reported by the node
    async fn chain_id(&self) -> Result<u64, ChainError>;
}
