//! Syntactic address validation.
//!
//! An address is valid when it is `0x` followed by 40 hex digits. Mixed-case
//! input must carry a correct EIP-55 checksum; single-case input is accepted
//! as is. Validity says nothing about whether a contract lives there.

use alloy_primitives::Address;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Address is empty")]
    Empty,

    #[error("Address must start with 0x")]
    MissingPrefix,

    #[error("Address must be 40 hex characters, got {0}")]
    InvalidLength(usize),

    #[error("Address contains non-hex characters")]
    InvalidHex,

    #[error("Address checksum mismatch")]
    InvalidChecksum,
}

/// Parse user input into an [`Address`].
pub fn parse_address(input: &str) -> Result<Address, AddressError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AddressError::Empty);
    }

    let Some(hex) = input.strip_prefix("0x") else {
        return Err(AddressError::MissingPrefix);
    };

    if hex.len() != 40 {
        return Err(AddressError::InvalidLength(hex.len()));
    }

    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AddressError::InvalidHex);
    }

    let address: Address = input.parse().map_err(|_| AddressError::InvalidHex)?;

    let has_lower = hex.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = hex.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper && address.to_checksum(None) != input {
        return Err(AddressError::InvalidChecksum);
    }

    Ok(address)
}

/// True if `input` would pass [`parse_address`].
pub fn is_address(input: &str) -> bool {
    parse_address(input).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_checksummed_address() {
        let address = parse_address(CHECKSUMMED).unwrap();
        assert_eq!(address.to_checksum(None), CHECKSUMMED);
    }

    #[test]
    fn test_lowercase_address() {
        let lower = CHECKSUMMED.to_lowercase();
        assert_eq!(
            parse_address(&lower).unwrap(),
            parse_address(CHECKSUMMED).unwrap()
        );
    }

    #[test]
    fn test_uppercase_hex_digits() {
        let upper = format!("0x{}", CHECKSUMMED[2..].to_uppercase());
        assert!(is_address(&upper));
    }

    #[test]
    fn test_bad_checksum() {
        // flip the case of the first letter
        let broken = CHECKSUMMED.replacen("f39F", "F39F", 1);
        assert_eq!(parse_address(&broken), Err(AddressError::InvalidChecksum));
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert!(is_address(&format!("  {CHECKSUMMED}\n")));
    }

    #[test]
    fn test_rejections() {
        assert_eq!(parse_address(""), Err(AddressError::Empty));
        assert_eq!(
            parse_address("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
            Err(AddressError::MissingPrefix)
        );
        assert_eq!(parse_address("0xToken"), Err(AddressError::InvalidLength(5)));
        assert_eq!(
            parse_address("0xz39fd6e51aad88f6f4ce6ab8827279cfffb92266"),
            Err(AddressError::InvalidHex)
        );
    }
}
