//! Domain layer - Core business logic and entities

pub mod chain;
pub mod error;
pub mod user;
pub mod wallet;

pub use chain::{ChainClient, ChainError, ChainHandle, DisabledReason, RetryConfig, TokenBalance};
pub use error::DomainError;
pub use user::{KycStatus, User, UserId, UserRepository, UserValidationError};
pub use wallet::{
    validate_address, AddressValidationError, BalanceResult, EthAddress, TokenBalanceResult,
    WalletRecord, WalletRepository,
};
