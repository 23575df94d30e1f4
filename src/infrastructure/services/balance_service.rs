//! Balance service - resolves whose balance to read and queries the chain

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, warn};

use crate::domain::chain::{ChainError, ChainHandle};
use crate::domain::user::{UserId, UserRepository};
use crate::domain::wallet::{
    format_amount, format_native, validate_address, BalanceResult, EthAddress, TokenBalanceResult,
    WalletRepository,
};
use crate::domain::DomainError;

/// Errors from balance lookups, displayed as the client-facing message
#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("Wallet address not provided. Please provide an 'address' query parameter.")]
    AddressRequired,

    #[error("Wallet address not provided and not found for authenticated user.")]
    NoStoredAddress,

    #[error("Invalid Ethereum wallet address format.")]
    InvalidAddress,

    #[error("Token contract address is required. Please provide a 'token_address' query parameter.")]
    TokenAddressRequired,

    #[error("Invalid Ethereum address format for wallet or token contract.")]
    InvalidTokenQuery,

    /// The node rejected the address parameter
    #[error("Invalid wallet address: {0}")]
    AddressRejected(String),

    #[error("Blockchain connection not available.")]
    Unavailable,

    #[error("An internal error occurred while fetching {what}.")]
    QueryFailed {
        what: &'static str,
        #[source]
        source: ChainError,
    },

    #[error("An internal error occurred while resolving the wallet address.")]
    Lookup(#[from] DomainError),
}

impl BalanceError {
    /// An amount the node returned that cannot be rendered in the major unit
    fn unformattable(error: DomainError, what: &'static str) -> Self {
        error!(error = %error, "Failed to format {}", what);
        Self::QueryFailed {
            what,
            source: ChainError::decode(error.to_string()),
        }
    }

    fn from_chain(error: ChainError, what: &'static str) -> Self {
        if let Some(message) = error.invalid_params_message() {
            warn!(%error, "Node rejected balance query parameters");
            return Self::AddressRejected(message.to_string());
        }

        match error {
            ChainError::Unavailable(_) => Self::Unavailable,
            other => {
                error!(error = %other, kind = other.kind(), "Failed to fetch {}", what);
                Self::QueryFailed {
                    what,
                    source: other,
                }
            }
        }
    }
}

/// Read-only balance lookups against the chain handle
#[derive(Debug)]
pub struct BalanceService<W: WalletRepository, U: UserRepository> {
    chain: ChainHandle,
    wallets: Arc<W>,
    users: Arc<U>,
}

impl<W: WalletRepository, U: UserRepository> BalanceService<W, U> {
    pub fn new(chain: ChainHandle, wallets: Arc<W>, users: Arc<U>) -> Self {
        Self {
            chain,
            wallets,
            users,
        }
    }

    pub fn chain(&self) -> &ChainHandle {
        &self.chain
    }

    /// Pick the address to query
    ///
    /// An explicit address wins; otherwise the caller's wallet record, then
    /// the wallet address on the caller's profile. Any non-empty explicit
    /// value counts, even whitespace, and is left for validation to reject.
    /// The returned string is the explicit input (trimmed) or the stored
    /// checksummed address.
    pub async fn resolve_address(
        &self,
        explicit: Option<&str>,
        caller: Option<&UserId>,
    ) -> Result<String, BalanceError> {
        if let Some(address) = explicit.filter(|a| !a.is_empty()) {
            return Ok(address.trim().to_string());
        }

        let Some(user_id) = caller else {
            return Err(BalanceError::AddressRequired);
        };

        if let Some(record) = self.wallets.get_by_user(user_id).await? {
            return Ok(record.address().checksummed());
        }

        let profile_address = self
            .users
            .get(user_id)
            .await?
            .and_then(|user| user.wallet_address().map(EthAddress::checksummed));

        profile_address.ok_or(BalanceError::NoStoredAddress)
    }

    /// Native-coin balance in the major unit
    pub async fn native_balance(
        &self,
        explicit: Option<&str>,
        caller: Option<&UserId>,
    ) -> Result<BalanceResult, BalanceError> {
        let wallet_address = self.resolve_address(explicit, caller).await?;
        let address = validate_address(&wallet_address).map_err(|_| BalanceError::InvalidAddress)?;

        let client = self
            .chain
            .client()
            .map_err(|e| BalanceError::from_chain(e, "wallet balance"))?;

        let wei = client
            .native_balance(&address)
            .await
            .map_err(|e| BalanceError::from_chain(e, "wallet balance"))?;

        Ok(BalanceResult {
            wallet_address,
            balance: format_native(wei)
                .map_err(|e| BalanceError::unformattable(e, "wallet balance"))?,
        })
    }

    /// ERC-20 balance formatted with the token's decimals
    pub async fn token_balance(
        &self,
        explicit: Option<&str>,
        token_address: Option<&str>,
        caller: Option<&UserId>,
    ) -> Result<TokenBalanceResult, BalanceError> {
        let wallet_address = self.resolve_address(explicit, caller).await?;

        let token_address = token_address
            .filter(|a| !a.is_empty())
            .ok_or(BalanceError::TokenAddressRequired)?
            .trim()
            .to_string();

        let (Ok(owner), Ok(token)) = (
            validate_address(&wallet_address),
            validate_address(&token_address),
        ) else {
            return Err(BalanceError::InvalidTokenQuery);
        };

        let client = self
            .chain
            .client()
            .map_err(|e| BalanceError::from_chain(e, "token balance"))?;

        let holding = client
            .token_balance(&owner, &token)
            .await
            .map_err(|e| BalanceError::from_chain(e, "token balance"))?;

        Ok(TokenBalanceResult {
            wallet_address,
            token_address,
            symbol: holding.symbol,
            balance: format_amount(holding.amount, holding.decimals)
                .map_err(|e| BalanceError::unformattable(e, "token balance"))?,
        })
    }
}
