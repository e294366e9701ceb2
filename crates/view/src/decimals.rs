//! Token address field with automatic decimals detection.

use crate::{FormError, ReadState, RequestId, RequestSeq};
use alloy_primitives::Address;
use token::{parse_address, parse_decimals, DecimalsOutcome};
use tracing::debug;

/// Detection the caller should perform for the current token address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalsRequest {
    pub id: RequestId,
    pub token: Address,
}

/// Token address and decimals inputs, shared by both panels.
///
/// The decimals text is editable by hand; a detection that completes for the
/// current address overwrites it.
#[derive(Debug)]
pub struct DecimalsField {
    token_address: String,
    decimals: String,
    fallback: u8,
    state: ReadState<u8>,
    seq: RequestSeq,
}

impl DecimalsField {
    pub fn new(fallback: u8) -> Self {
        Self {
            token_address: String::new(),
            decimals: fallback.to_string(),
            fallback,
            state: ReadState::Idle,
            seq: RequestSeq::new(),
        }
    }

    /// Edit the token address.
    ///
    /// Any in-flight detection becomes stale. A new detection is requested
    /// only if the address is syntactically valid.
    pub fn set_token_address(&mut self, value: impl Into<String>) -> Option<DecimalsRequest> {
        self.token_address = value.into();
        let id = self.seq.next();

        match parse_address(&self.token_address) {
            Ok(token) => {
                self.state = ReadState::Loading;
                Some(DecimalsRequest { id, token })
            }
            Err(_) => {
                self.state = ReadState::Idle;
                None
            }
        }
    }

    /// Apply a detection result. Returns false if `id` was superseded.
    pub fn apply(&mut self, id: RequestId, outcome: &DecimalsOutcome) -> bool {
        if !self.seq.is_current(id) {
            debug!(?id, "Dropping stale decimals result");
            return false;
        }

        self.decimals = outcome.decimals(self.fallback).to_string();
        self.state = match outcome {
            DecimalsOutcome::Detected(decimals) => ReadState::Success(*decimals),
            DecimalsOutcome::Failed(reason) => ReadState::Error(reason.clone()),
            DecimalsOutcome::TimedOut => ReadState::TimedOut,
        };
        true
    }

    /// Manual edit of the decimals field.
    pub fn set_decimals(&mut self, value: impl Into<String>) {
        self.decimals = value.into();
    }

    /// Use `value` instead of detecting; a detection in flight becomes stale.
    pub fn override_decimals(&mut self, value: impl Into<String>) {
        self.seq.next();
        self.state = ReadState::Idle;
        self.decimals = value.into();
    }

    pub fn token_address(&self) -> &str {
        &self.token_address
    }

    pub fn decimals_text(&self) -> &str {
        &self.decimals
    }

    pub const fn state(&self) -> &ReadState<u8> {
        &self.state
    }

    pub const fn is_detecting(&self) -> bool {
        self.state.is_loading()
    }

    /// Detection failed or timed out and the fallback is in use.
    pub const fn detection_failed(&self) -> bool {
        self.state.is_failed()
    }

    pub fn token(&self) -> Option<Address> {
        parse_address(&self.token_address).ok()
    }

    /// Current decimals as entered or detected.
    pub fn decimals(&self) -> Result<u8, FormError> {
        parse_decimals(&self.decimals).map_err(|_| FormError::InvalidDecimals(self.decimals.clone()))
    }

    /// Decimals for display, falling back when the field does not parse.
    pub fn display_decimals(&self) -> u8 {
        self.decimals().unwrap_or(self.fallback)
    }

    /// Status hint shown next to the token address.
    pub fn hint(&self) -> Option<String> {
        if self.is_detecting() {
            return Some("Detecting decimals...".to_string());
        }
        if self.detection_failed() {
            return Some(format!(
                "Failed to detect decimals. Using default ({}).",
                self.fallback
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN_A: &str = "0x1111111111111111111111111111111111111111";
    const TOKEN_B: &str = "0x2222222222222222222222222222222222222222";

    #[test]
    fn test_invalid_address_requests_nothing() {
        let mut field = DecimalsField::new(18);

        assert!(field.set_token_address("0xToken").is_none());
        assert!(field.set_token_address("").is_none());
        assert!(field.set_token_address("0x11111111111111111111111111111111111111").is_none());
        assert_eq!(field.state(), &ReadState::Idle);
        assert!(field.hint().is_none());
    }

    #[test]
    fn test_detection_sets_decimals() {
        let mut field = DecimalsField::new(18);
        let request = field.set_token_address(TOKEN_A).unwrap();

        assert_eq!(request.token, Address::repeat_byte(0x11));
        assert!(field.is_detecting());
        assert_eq!(field.hint().as_deref(), Some("Detecting decimals..."));

        assert!(field.apply(request.id, &DecimalsOutcome::Detected(6)));
        assert_eq!(field.decimals_text(), "6");
        assert_eq!(field.decimals(), Ok(6));
        assert_eq!(field.state(), &ReadState::Success(6));
        assert!(field.hint().is_none());
    }

    #[test]
    fn test_timeout_falls_back_with_warning() {
        let mut field = DecimalsField::new(18);
        let request = field.set_token_address(TOKEN_A).unwrap();
        field.set_decimals("6");

        assert!(field.apply(request.id, &DecimalsOutcome::TimedOut));
        assert_eq!(field.decimals_text(), "18");
        assert!(field.detection_failed());
        assert_eq!(
            field.hint().as_deref(),
            Some("Failed to detect decimals. Using default (18).")
        );
    }

    #[test]
    fn test_override_cancels_detection() {
        let mut field = DecimalsField::new(18);
        let request = field.set_token_address(TOKEN_A).unwrap();
        field.override_decimals("2");

        assert!(!field.apply(request.id, &DecimalsOutcome::Detected(6)));
        assert_eq!(field.decimals(), Ok(2));
        assert_eq!(field.state(), &ReadState::Idle);
        assert!(field.hint().is_none());
    }

    #[test]
    fn test_stale_detection_is_dropped() {
        let mut field = DecimalsField::new(18);
        let stale = field.set_token_address(TOKEN_A).unwrap();
        let current = field.set_token_address(TOKEN_B).unwrap();

        assert!(!field.apply(stale.id, &DecimalsOutcome::Detected(6)));
        assert_eq!(field.decimals_text(), "18");
        assert!(field.is_detecting());

        assert!(field.apply(current.id, &DecimalsOutcome::Detected(8)));
        assert_eq!(field.decimals_text(), "8");
    }

    #[test]
    fn test_edit_to_invalid_cancels_detection() {
        let mut field = DecimalsField::new(18);
        let request = field.set_token_address(TOKEN_A).unwrap();
        assert!(field.set_token_address("0x1").is_none());

        assert!(!field.apply(request.id, &DecimalsOutcome::Failed("reverted".into())));
        assert_eq!(field.state(), &ReadState::Idle);
        assert!(!field.detection_failed());
    }

    #[test]
    fn test_manual_decimals() {
        let mut field = DecimalsField::new(18);
        field.set_decimals("abc");
        assert_eq!(field.decimals(), Err(FormError::InvalidDecimals("abc".into())));
        assert_eq!(field.display_decimals(), 18);

        field.set_decimals("2");
        assert_eq!(field.decimals(), Ok(2));
    }
}
