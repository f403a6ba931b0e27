//! Exact conversion between human decimal amounts and token base units.
//!
//! The token uses a small fixed number of decimals, but conversions
//! still go through string parsing rather than floats so no amount is
//! ever rounded on its way to a transaction.

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::U256;

use crate::error::{CliError, Result};

/// Parse a human decimal amount ("154.23") into base units.
///
/// Rejects negative amounts and anything with more fractional digits
/// than the token carries.
pub fn to_base_units(amount: &str, decimals: u8) -> Result<U256> {
    let parsed = parse_units(amount, decimals).map_err(|e| {
        CliError::Validation(format!("expected a decimal token amount, got '{}': {}", amount, e))
    })?;
    if parsed.is_negative() {
        return Err(CliError::Validation(format!(
            "token amounts must be positive, got '{}'",
            amount
        )));
    }
    Ok(parsed.get_absolute())
}

/// Render base units as a human decimal string, trimming trailing
/// fractional zeros ("154.230000" prints as "154.23").
pub fn from_base_units(value: U256, decimals: u8) -> String {
    let rendered = match format_units(value, decimals) {
        Ok(s) => s,
        Err(_) => return value.to_string(),
    };
    if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        rendered
    }
}

/// Parse a gas price given in gwei ("2.5") into wei.
pub fn gwei_to_wei(gwei: &str) -> Result<u128> {
    let parsed = parse_units(gwei, 9).map_err(|e| {
        CliError::Validation(format!("expected a gas price in gwei, got '{}': {}", gwei, e))
    })?;
    if parsed.is_negative() {
        return Err(CliError::Validation(format!(
            "gas price must be positive, got '{}'",
            gwei
        )));
    }
    parsed
        .get_absolute()
        .try_into()
        .map_err(|_| CliError::Validation(format!("gas price '{}' gwei is out of range", gwei)))
}
