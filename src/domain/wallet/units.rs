//! Conversion of on-chain integer amounts to human-readable decimals

use alloy_primitives::{U256, utils::format_units};

use crate::domain::DomainError;

/// Decimals of the native coin (wei -> ether)
pub const NATIVE_DECIMALS: u8 = 18;

/// Format an amount in the smallest unit as a decimal string in the major unit
///
/// The rendering is exact; trailing fractional zeros are trimmed so that
/// `5123400000000000000` wei with 18 decimals becomes `"5.1234"` and zero
/// becomes `"0"`.
pub fn format_amount(amount: U256, decimals: u8) -> Result<String, DomainError> {
    let formatted = format_units(amount, decimals).map_err(|e| {
        DomainError::validation(format!(
            "Cannot format amount {} with {} decimals: {}",
            amount, decimals, e
        ))
    })?;

    if !formatted.contains('.') {
        return Ok(formatted);
    }

    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');

    if trimmed.is_empty() {
        Ok("0".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// Format a native-coin balance given in wei
pub fn format_native(amount: U256) -> Result<String, DomainError> {
    format_amount(amount, NATIVE_DECIMALS)
}
