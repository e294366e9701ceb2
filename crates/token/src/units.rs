//! Conversion between human-readable amounts and integer base units.

use alloy_primitives::U256;
use thiserror::Error;

/// Largest precision whose scale factor `10^decimals` fits in a `U256`.
pub const MAX_DECIMALS: u8 = 77;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    #[error("Amount is empty")]
    Empty,

    #[error("Amount must not be negative")]
    Negative,

    #[error("Invalid amount: {0}")]
    Invalid(String),

    #[error("Amount has {got} decimal places but the token only supports {max}")]
    TooPrecise { got: usize, max: u8 },

    #[error("Amount does not fit in 256 bits")]
    Overflow,

    #[error("Invalid decimals: {0}")]
    InvalidDecimals(String),
}

/// Parse a decimal string such as `"1.5"` into base units at `decimals`.
///
/// Fractional digits beyond `decimals` are rejected rather than rounded.
pub fn parse_units(input: &str, decimals: u8) -> Result<U256, UnitsError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UnitsError::Empty);
    }
    if input.starts_with('-') {
        return Err(UnitsError::Negative);
    }

    let (integer, fraction) = match input.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (input, ""),
    };

    if integer.is_empty() && fraction.is_empty() {
        return Err(UnitsError::Invalid(input.to_string()));
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(integer) || !all_digits(fraction) {
        return Err(UnitsError::Invalid(input.to_string()));
    }

    if fraction.len() > decimals as usize {
        return Err(UnitsError::TooPrecise {
            got: fraction.len(),
            max: decimals,
        });
    }

    let scale = pow10(decimals)?;
    let integer = parse_digits(integer)?;
    let padded = format!("{fraction:0<width$}", width = decimals as usize);
    let fraction = parse_digits(&padded)?;

    integer
        .checked_mul(scale)
        .and_then(|scaled| scaled.checked_add(fraction))
        .ok_or(UnitsError::Overflow)
}

/// Render base units as a decimal string with trailing fractional zeros removed.
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (integer, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{integer}.{fraction}")
    }
}

/// Parse the decimals form field.
pub fn parse_decimals(input: &str) -> Result<u8, UnitsError> {
    let input = input.trim();
    let decimals: u8 = input
        .parse()
        .map_err(|_| UnitsError::InvalidDecimals(input.to_string()))?;

    if decimals > MAX_DECIMALS {
        return Err(UnitsError::InvalidDecimals(input.to_string()));
    }

    Ok(decimals)
}

fn pow10(decimals: u8) -> Result<U256, UnitsError> {
    U256::from(10u8)
        .checked_pow(U256::from(decimals))
        .ok_or(UnitsError::Overflow)
}

fn parse_digits(digits: &str) -> Result<U256, UnitsError> {
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 10).map_err(|_| UnitsError::Overflow)
}
