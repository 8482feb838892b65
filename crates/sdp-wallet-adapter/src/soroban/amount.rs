/*
[INPUT]:  Decimal amount and balance strings from the caller
[OUTPUT]: Exact stroop amounts (i128), or validation errors
[POS]:    Soroban layer - amount parsing and balance checks
[UPDATE]: When amount precision rules change
*/

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::http::{Result, SdpWalletError};

/// Stroops per whole unit of any 7-decimal Stellar asset
const STROOPS_PER_UNIT: i64 = 10_000_000;

/// Maximum fractional digits an amount may carry
const MAX_DECIMAL_PLACES: u32 = 7;

/// Convert a decimal amount string to an exact number of stroops.
///
/// Rejects non-positive values, more than 7 fractional digits, and anything
/// that does not convert to an integer stroop count without a remainder.
/// Rounding is never applied silently.
pub fn resolve_amount_in_stroops(amount: &str) -> Result<i128> {
    let parsed = Decimal::from_str(amount.trim())
        .map_err(|_| SdpWalletError::Validation(format!("Invalid amount: {amount}")))?;

    if parsed <= Decimal::ZERO {
        return Err(SdpWalletError::Validation(format!(
            "Amount must be positive: {amount}"
        )));
    }

    if parsed.scale() > MAX_DECIMAL_PLACES {
        return Err(SdpWalletError::Validation(format!(
            "Amount {amount} has more than 7 decimal places"
        )));
    }

    let stroops = parsed
        .checked_mul(Decimal::from(STROOPS_PER_UNIT))
        .ok_or_else(|| SdpWalletError::Validation(format!("Amount out of range: {amount}")))?;

    if !stroops.fract().is_zero() {
        return Err(SdpWalletError::Validation(format!(
            "Amount {amount} does not convert to a whole number of stroops"
        )));
    }

    stroops
        .to_i128()
        .ok_or_else(|| SdpWalletError::Validation(format!("Amount out of range: {amount}")))
}

/// Validate an amount against the available balance and convert to stroops
pub fn validate_amount(amount: &str, balance: &str) -> Result<i128> {
    let stroops = resolve_amount_in_stroops(amount)?;

    let parsed_amount = Decimal::from_str(amount.trim())
        .map_err(|_| SdpWalletError::Validation(format!("Invalid amount: {amount}")))?;
    let parsed_balance = Decimal::from_str(balance.trim())
        .map_err(|_| SdpWalletError::Validation(format!("Invalid balance: {balance}")))?;

    if parsed_amount > parsed_balance {
        return Err(SdpWalletError::Validation(format!(
            "Insufficient balance: {amount} exceeds {balance}"
        )));
    }

    Ok(stroops)
}
