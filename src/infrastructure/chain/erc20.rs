//! Minimal ERC-20 read interface: call encoding and return decoding

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};

use crate::domain::chain::ChainError;

sol! {
    function balanceOf(address owner) external view returns (uint256);
    function decimals() external view returns (uint8);
    function symbol() external view returns (string);
}

const WORD: usize = 32;

pub fn balance_of_calldata(owner: Address) -> Vec<u8> {
    balanceOfCall { owner }.abi_encode()
}

pub fn decimals_calldata() -> Vec<u8> {
    decimalsCall {}.abi_encode()
}

pub fn symbol_calldata() -> Vec<u8> {
    symbolCall {}.abi_encode()
}

fn word(data: &[u8], index: usize) -> Result<U256, ChainError> {
    let start = index * WORD;

    data.get(start..start + WORD)
        .map(U256::from_be_slice)
        .ok_or_else(|| {
            ChainError::decode(format!(
                "Return data too short: {} bytes, need word {}",
                data.len(),
                index
            ))
        })
}

fn word_as_usize(data: &[u8], index: usize) -> Result<usize, ChainError> {
    let value = word(data, index)?;

    usize::try_from(value)
        .map_err(|_| ChainError::decode(format!("ABI offset or length out of range: {}", value)))
}

/// Decode a single `uint256` return value
pub fn decode_uint256(data: &[u8]) -> Result<U256, ChainError> {
    word(data, 0)
}

/// Decode the `uint8` returned by `decimals()`
pub fn decode_decimals(data: &[u8]) -> Result<u8, ChainError> {
    let value = word(data, 0)?;

    if value > U256::from(u8::MAX) {
        return Err(ChainError::decode(format!(
            "Token decimals out of range: {}",
            value
        )));
    }

    Ok(value.to::<u8>())
}

/// Decode the `string` returned by `symbol()`
///
/// Older tokens return a `bytes32` instead; that form is accepted too, with
/// the zero padding removed.
pub fn decode_symbol(data: &[u8]) -> Result<String, ChainError> {
    if data.len() == WORD {
        let end = data.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        return Ok(String::from_utf8_lossy(&data[..end]).into_owned());
    }

    let offset = word_as_usize(data, 0)?;

    if offset % WORD != 0 {
        return Err(ChainError::decode(format!("Misaligned string offset: {}", offset)));
    }

    let length = word_as_usize(data, offset / WORD)?;
    let start = offset + WORD;

    let bytes = start
        .checked_add(length)
        .and_then(|end| data.get(start..end))
        .ok_or_else(|| ChainError::decode("String length exceeds return data"))?;

    String::from_utf8(bytes.to_vec())
        .map_err(|e| ChainError::decode(format!("Token symbol is not UTF-8: {}", e)))
}
