//! ERC20 token reads and writes for the allowance flow.
//!
//! This crate provides:
//! - Syntactic address validation and human/base-unit amount conversion
//! - The [`TokenReader`] / [`TokenWriter`] seams and their alloy implementation
//! - Decimals detection with retry, timeout and fallback
//! - Allowance checks scoped to (token, owner, spender)

pub mod address;
pub mod allowance;
pub mod decimals;
pub mod reader;
pub mod units;

pub use address::{is_address, parse_address, AddressError};
pub use allowance::{check_allowance, Allowance, AllowanceQuery};
pub use decimals::{detect_decimals, DecimalsOutcome, DetectionConfig, DEFAULT_DECIMALS};
pub use reader::{Erc20Token, ReceiptInfo, TokenReader, TokenWriter};
pub use units::{format_units, parse_decimals, parse_units, UnitsError};
