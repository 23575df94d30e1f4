//! Ethereum address validation and EIP-55 canonicalization

use std::str::FromStr;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of hex characters in an address body (20 bytes)
const ADDRESS_HEX_LENGTH: usize = 40;

/// Errors that can occur during address validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressValidationError {
    #[error("Address cannot be empty")]
    Empty,

    #[error("Address must start with '0x'")]
    MissingPrefix,

    #[error("Address must contain exactly 40 hex characters, got {0}")]
    InvalidLength(usize),

    #[error("Address contains invalid hex character: '{0}'")]
    InvalidCharacter(char),

    #[error("Address has mixed case but does not match its EIP-55 checksum")]
    ChecksumMismatch,
}

/// A syntactically valid Ethereum address
///
/// Always rendered in its checksummed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EthAddress(Address);

impl EthAddress {
    /// Parse and validate an address string
    pub fn parse(value: &str) -> Result<Self, AddressValidationError> {
        validate_address(value)
    }

    /// The EIP-55 checksummed representation
    pub fn checksummed(&self) -> String {
        self.0.to_checksum(None)
    }

    /// The underlying 20-byte address
    pub fn as_address(&self) -> &Address {
        &self.0
    }
}

impl From<Address> for EthAddress {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

impl TryFrom<String> for EthAddress {
    type Error = AddressValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EthAddress> for String {
    fn from(address: EthAddress) -> Self {
        address.checksummed()
    }
}

impl FromStr for EthAddress {
    type Err = AddressValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for EthAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.checksummed())
    }
}

/// Validate an Ethereum address string
///
/// Rules:
/// - Surrounding whitespace is ignored
/// - Must start with `0x` (or `0X`)
/// - Exactly 40 hex characters after the prefix
/// - All-lowercase or all-uppercase bodies skip the checksum check
/// - Mixed-case bodies must match the EIP-55 checksum
pub fn validate_address(value: &str) -> Result<EthAddress, AddressValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(AddressValidationError::Empty);
    }

    let body = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or(AddressValidationError::MissingPrefix)?;

    if let Some(c) = body.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(AddressValidationError::InvalidCharacter(c));
    }

    if body.len() != ADDRESS_HEX_LENGTH {
        return Err(AddressValidationError::InvalidLength(body.len()));
    }

    let address = Address::from_str(body)
        .map_err(|_| AddressValidationError::InvalidLength(body.len()))?;

    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());

    if has_lower && has_upper {
        let expected = address.to_checksum(None);

        if expected[2..] != *body {
            return Err(AddressValidationError::ChecksumMismatch);
        }
    }

    Ok(EthAddress(address))
}

/// Validate and return the checksummed form of an address
pub fn to_checksum_address(value: &str) -> Result<String, AddressValidationError> {
    validate_address(value).map(|a| a.checksummed())
}
