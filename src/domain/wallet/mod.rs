//! Wallet domain
//!
//! Address validation, the user-to-wallet record, and balance value objects.

mod address;
mod entity;
mod repository;
mod units;

pub use address::{to_checksum_address, validate_address, AddressValidationError, EthAddress};
pub use entity::{BalanceResult, TokenBalanceResult, WalletRecord};
pub use repository::WalletRepository;
pub use units::{format_amount, format_native, NATIVE_DECIMALS};
