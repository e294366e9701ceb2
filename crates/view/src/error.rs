//! Form validation errors.

use token::{AddressError, UnitsError};
use thiserror::Error;

/// Reasons a form submission is blocked before any network call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Please connect your wallet to continue")]
    NotConnected,

    #[error("A transaction is already in progress")]
    Busy,

    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Invalid {field} address: {source}")]
    InvalidAddress {
        field: &'static str,
        source: AddressError,
    },

    #[error("Invalid decimals: {0}")]
    InvalidDecimals(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] UnitsError),

    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("No allowance found. The sender has not granted you an allowance yet.")]
    NoAllowance,

    #[error("Insufficient allowance. You can only pull up to {max} tokens.")]
    InsufficientAllowance {
        /// Allowance in human units
        max: String,
    },
}

impl FormError {
    /// Stable short name, used as a metrics label.
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::NotConnected => "not_connected",
            Self::Busy => "busy",
            Self::MissingFields => "missing_fields",
            Self::InvalidAddress { .. } => "invalid_address",
            Self::InvalidDecimals(_) => "invalid_decimals",
            Self::InvalidAmount(_) => "invalid_amount",
            Self::ZeroAmount => "zero_amount",
            Self::NoAllowance => "no_allowance",
            Self::InsufficientAllowance { .. } => "insufficient_allowance",
        }
    }
}
