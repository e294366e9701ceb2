//! Pull Funds panel.

use crate::{
    busy_label, or_placeholder, DecimalsField, DecimalsRequest, FormError, ReadState, RequestId,
    RequestSeq,
};
use action::{Pull, TxStatus};
use alloy_primitives::{Address, U256};
use token::{format_units, is_address, parse_address, parse_units, AllowanceQuery, DecimalsOutcome};
use tracing::debug;

/// Allowance read the caller should perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowanceRequest {
    pub id: RequestId,
    pub query: AllowanceQuery,
}

/// Receiver panel: pull an allowed amount from the sender.
///
/// The connected account is the spender and the recipient.
#[derive(Debug)]
pub struct ReceiverView {
    account: Option<Address>,
    token: DecimalsField,
    sender_address: String,
    amount: String,
    allowance: ReadState<U256>,
    allowance_seq: RequestSeq,
    tx: TxStatus,
}

impl ReceiverView {
    pub fn new(account: Option<Address>, fallback_decimals: u8) -> Self {
        Self {
            account,
            token: DecimalsField::new(fallback_decimals),
            sender_address: String::new(),
            amount: String::new(),
            allowance: ReadState::Idle,
            allowance_seq: RequestSeq::new(),
            tx: TxStatus::Idle,
        }
    }

    pub fn set_account(&mut self, account: Option<Address>) {
        self.account = account;
        self.invalidate_allowance();
    }

    /// Edit the token address. Invalidates the allowance read.
    pub fn set_token_address(&mut self, value: impl Into<String>) -> Option<DecimalsRequest> {
        self.invalidate_allowance();
        self.token.set_token_address(value)
    }

    pub fn apply_decimals(&mut self, id: RequestId, outcome: &DecimalsOutcome) -> bool {
        self.token.apply(id, outcome)
    }

    /// Edit the sender address. Invalidates the allowance read.
    pub fn set_sender_address(&mut self, value: impl Into<String>) {
        self.sender_address = value.into();
        self.invalidate_allowance();
    }

    pub fn set_amount(&mut self, value: impl Into<String>) {
        self.amount = value.into();
    }

    pub fn set_decimals(&mut self, value: impl Into<String>) {
        self.token.set_decimals(value);
    }

    /// Manual decimals that detection must not overwrite.
    pub fn override_decimals(&mut self, value: impl Into<String>) {
        self.token.override_decimals(value);
    }

    pub fn set_tx_status(&mut self, status: TxStatus) {
        self.tx = status;
    }

    pub const fn tx_status(&self) -> &TxStatus {
        &self.tx
    }

    pub const fn token_field(&self) -> &DecimalsField {
        &self.token
    }

    pub const fn allowance_state(&self) -> &ReadState<U256> {
        &self.allowance
    }

    /// Request an allowance read for the current inputs (also the manual refresh).
    ///
    /// Returns `None` and issues nothing unless token, sender and the
    /// connected account are all known.
    pub fn refresh_allowance(&mut self) -> Option<AllowanceRequest> {
        let query =
            AllowanceQuery::from_inputs(self.token.token_address(), &self.sender_address, self.account)?;

        let id = self.allowance_seq.next();
        self.allowance = ReadState::Loading;
        Some(AllowanceRequest { id, query })
    }

    /// Apply an allowance read. Returns false if `id` was superseded.
    pub fn apply_allowance(&mut self, id: RequestId, result: Result<U256, String>) -> bool {
        if !self.allowance_seq.is_current(id) {
            debug!(?id, "Dropping stale allowance result");
            return false;
        }

        self.allowance = match result {
            Ok(amount) => ReadState::Success(amount),
            Err(reason) => ReadState::Error(reason),
        };
        true
    }

    /// Last-known allowance; zero while unknown.
    pub fn allowance(&self) -> U256 {
        self.allowance.value().copied().unwrap_or(U256::ZERO)
    }

    pub fn has_allowance(&self) -> bool {
        self.allowance() > U256::ZERO
    }

    /// Pull control enabled. Never true while the allowance is zero or unknown.
    pub fn can_submit(&self) -> bool {
        self.account.is_some() && self.has_allowance() && !self.tx.is_busy()
    }

    /// Validate the form into a pull.
    ///
    /// The checks against the allowance use the last read and are advisory.
    pub fn submit(&self) -> Result<Pull, FormError> {
        let Some(recipient) = self.account else {
            return Err(FormError::NotConnected);
        };
        if self.tx.is_busy() {
            return Err(FormError::Busy);
        }

        let fields = [
            self.token.token_address(),
            self.sender_address.as_str(),
            self.amount.as_str(),
        ];
        if fields.iter().any(|field| field.trim().is_empty()) {
            return Err(FormError::MissingFields);
        }

        let token = parse_address(self.token.token_address())
            .map_err(|source| FormError::InvalidAddress { field: "token", source })?;
        let owner = parse_address(&self.sender_address)
            .map_err(|source| FormError::InvalidAddress { field: "sender", source })?;

        if !self.has_allowance() {
            return Err(FormError::NoAllowance);
        }

        let decimals = self.token.decimals()?;
        let amount = parse_units(&self.amount, decimals)?;
        if amount == U256::ZERO {
            return Err(FormError::ZeroAmount);
        }

        let allowance = self.allowance();
        if amount > allowance {
            return Err(FormError::InsufficientAllowance {
                max: format_units(allowance, decimals),
            });
        }

        Ok(Pull {
            token,
            owner,
            recipient,
            amount,
            decimals,
        })
    }

    pub fn render(&self) -> Vec<String> {
        let Some(account) = self.account else {
            return vec!["Please connect your wallet to continue".to_string()];
        };

        let mut lines = vec![
            "Pull Funds (Receiver)".to_string(),
            String::new(),
            format!(
                "Token Contract Address: {}",
                or_placeholder(self.token.token_address(), "0x...")
            ),
        ];

        let mut token_help = "  The ERC20 token to receive".to_string();
        if let Some(hint) = self.token.hint() {
            token_help.push_str("  ");
            token_help.push_str(&hint);
        }
        lines.push(token_help);

        lines.push(format!(
            "Sender Address: {}",
            or_placeholder(&self.sender_address, "0x...")
        ));
        lines.push("  The address that granted you the allowance".to_string());
        lines.push(format!(
            "Amount: {}    Decimals: {}",
            or_placeholder(&self.amount, "1000"),
            self.token.decimals_text()
        ));
        lines.push(format!("Your address: {account}"));
        lines.push("  Funds will be transferred to this address".to_string());

        if is_address(self.token.token_address()) && is_address(&self.sender_address) {
            lines.push(String::new());
            lines.extend(self.render_allowance());
        }

        lines.push(String::new());
        let label = busy_label(&self.tx).unwrap_or("Pull Funds");
        if self.can_submit() {
            lines.push(format!("[ {label} ]"));
        } else {
            lines.push(format!("[ {label} ] (disabled)"));
        }

        if !self.has_allowance()
            && !self.token.token_address().is_empty()
            && !self.sender_address.is_empty()
        {
            lines.push(
                "Button disabled: No allowance found. Check allowance status above.".to_string(),
            );
        }

        if let Some(hash) = self.tx.tx_hash() {
            lines.push(String::new());
            lines.push(format!("Transaction Hash: {hash}"));
        }

        match &self.tx {
            TxStatus::Confirmed(_) => lines.push("✓ Funds received successfully!".to_string()),
            TxStatus::Failed(reason) => lines.push(format!("✗ Error transferring tokens: {reason}")),
            _ => {}
        }

        lines.push(String::new());
        lines.push("Safety Note:".to_string());
        lines.push(
            "  If the sender made a mistake with your address, this tool will detect that you do \
             not have an allowance and disallow you from sending a transaction which is known to \
             fail. The sender can then correct their mistake and grant the allowance to your \
             actual address."
                .to_string(),
        );

        lines
    }

    /// Supersede any in-flight allowance read and forget the last result.
    fn invalidate_allowance(&mut self) {
        self.allowance_seq.next();
        self.allowance = ReadState::Idle;
    }

    fn render_allowance(&self) -> Vec<String> {
        let mut lines = vec!["Allowance Status".to_string()];

        match &self.allowance {
            ReadState::Loading => lines.push("  Checking allowance...".to_string()),
            ReadState::Error(reason) => {
                lines.push(format!("  ✗ Failed to check allowance: {reason}"));
            }
            _ if self.has_allowance() => {
                lines.push(format!(
                    "  ✓ Allowance Found: {} tokens",
                    format_units(self.allowance(), self.token.display_decimals())
                ));
                lines.push("  You can pull up to this amount from the sender.".to_string());
            }
            _ => {
                lines.push("  ✗ No allowance found".to_string());
                lines.push(
                    "  The sender has not granted you an allowance yet, or you entered the wrong \
                     addresses."
                        .to_string(),
                );
            }
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "0x1111111111111111111111111111111111111111";
    const SENDER: &str = "0x2222222222222222222222222222222222222222";

    fn account() -> Address {
        Address::repeat_byte(9)
    }

    /// View with token (decimals 6) and sender set and the given allowance applied.
    fn with_allowance(allowance: u64) -> ReceiverView {
        let mut view = ReceiverView::new(Some(account()), 18);
        let decimals = view.set_token_address(TOKEN).unwrap();
        view.apply_decimals(decimals.id, &DecimalsOutcome::Detected(6));
        view.set_sender_address(SENDER);

        let request = view.refresh_allowance().unwrap();
        assert!(view.apply_allowance(request.id, Ok(U256::from(allowance))));
        view
    }

    #[test]
    fn test_allowance_query_uses_connected_account_as_spender() {
        let mut view = ReceiverView::new(Some(account()), 18);
        view.set_token_address(TOKEN);
        view.set_sender_address(SENDER);

        let request = view.refresh_allowance().unwrap();
        assert_eq!(request.query.token, Address::repeat_byte(0x11));
        assert_eq!(request.query.owner, Address::repeat_byte(0x22));
        assert_eq!(request.query.spender, account());
        assert!(view.allowance_state().is_loading());
    }

    #[test]
    fn test_no_allowance_read_without_valid_inputs() {
        let mut view = ReceiverView::new(Some(account()), 18);
        view.set_token_address(TOKEN);
        view.set_sender_address("0xSender");
        assert!(view.refresh_allowance().is_none());

        let mut disconnected = ReceiverView::new(None, 18);
        disconnected.set_token_address(TOKEN);
        disconnected.set_sender_address(SENDER);
        assert!(disconnected.refresh_allowance().is_none());
    }

    #[test]
    fn test_zero_allowance_disables_pull() {
        let mut view = with_allowance(0);
        view.set_amount("1");

        assert!(!view.can_submit());
        assert_eq!(view.submit(), Err(FormError::NoAllowance));

        let lines = view.render();
        assert!(lines.contains(&"  ✗ No allowance found".to_string()));
        assert!(lines.contains(&"[ Pull Funds ] (disabled)".to_string()));
        assert!(lines.contains(
            &"Button disabled: No allowance found. Check allowance status above.".to_string()
        ));
    }

    #[test]
    fn test_pull_within_allowance() {
        let mut view = with_allowance(50);
        view.set_amount("0.00005");

        assert!(view.can_submit());
        let pull = view.submit().unwrap();
        assert_eq!(pull.amount, U256::from(50));
        assert_eq!(pull.owner, Address::repeat_byte(0x22));
        assert_eq!(pull.recipient, account());
    }

    #[test]
    fn test_pull_over_allowance_names_max() {
        let mut view = with_allowance(50);
        view.set_amount("0.000051");

        let err = view.submit().unwrap_err();
        assert_eq!(
            err,
            FormError::InsufficientAllowance {
                max: "0.00005".to_string()
            }
        );
        assert_eq!(
            err.to_string(),
            "Insufficient allowance. You can only pull up to 0.00005 tokens."
        );
    }

    #[test]
    fn test_zero_amount_rejected() {
        let mut view = with_allowance(50);
        view.set_amount("0");
        assert_eq!(view.submit(), Err(FormError::ZeroAmount));
    }

    #[test]
    fn test_sender_edit_drops_inflight_allowance() {
        let mut view = ReceiverView::new(Some(account()), 18);
        view.set_token_address(TOKEN);
        view.set_sender_address(SENDER);
        let stale = view.refresh_allowance().unwrap();

        view.set_sender_address("0x3333333333333333333333333333333333333333");
        assert!(!view.apply_allowance(stale.id, Ok(U256::from(1000))));
        assert_eq!(view.allowance(), U256::ZERO);
        assert_eq!(view.allowance_state(), &ReadState::Idle);
    }

    #[test]
    fn test_token_edit_drops_inflight_allowance() {
        let mut view = with_allowance(50);
        let stale = view.refresh_allowance().unwrap();

        view.set_token_address("0x4444444444444444444444444444444444444444");
        assert!(!view.apply_allowance(stale.id, Ok(U256::from(1000))));
        assert_eq!(view.allowance_state(), &ReadState::Idle);
        assert!(!view.can_submit());

        let fresh = view.refresh_allowance().unwrap();
        assert_eq!(fresh.query.token, Address::repeat_byte(0x44));
        assert!(view.apply_allowance(fresh.id, Ok(U256::from(7))));
        assert_eq!(view.allowance(), U256::from(7));
    }

    #[test]
    fn test_account_change_clears_known_allowance() {
        let mut view = with_allowance(50);
        assert!(view.has_allowance());

        view.set_account(Some(Address::repeat_byte(8)));
        assert!(!view.has_allowance());
        assert_eq!(view.allowance_state(), &ReadState::Idle);
    }

    #[test]
    fn test_refresh_supersedes_previous_read() {
        let mut view = with_allowance(50);
        let first = view.refresh_allowance().unwrap();
        let second = view.refresh_allowance().unwrap();

        assert!(!view.apply_allowance(first.id, Ok(U256::from(1))));
        assert!(view.apply_allowance(second.id, Ok(U256::from(70))));
        assert_eq!(view.allowance(), U256::from(70));
    }

    #[test]
    fn test_allowance_error_blocks_pull() {
        let mut view = with_allowance(50);
        let request = view.refresh_allowance().unwrap();
        view.apply_allowance(request.id, Err("rpc down".to_string()));
        view.set_amount("0.00001");

        assert_eq!(view.submit(), Err(FormError::NoAllowance));
        assert!(view
            .render()
            .contains(&"  ✗ Failed to check allowance: rpc down".to_string()));
    }

    #[test]
    fn test_render_allowance_found() {
        let view = with_allowance(1_500_000);
        let lines = view.render();

        assert!(lines.contains(&"  ✓ Allowance Found: 1.5 tokens".to_string()));
        assert!(lines.contains(&format!("Your address: {}", account())));
        assert!(lines.contains(&"[ Pull Funds ]".to_string()));
    }

    #[test]
    fn test_render_confirmed() {
        let mut view = with_allowance(50);
        view.set_tx_status(TxStatus::Confirmed(alloy_primitives::TxHash::repeat_byte(7)));
        assert!(view
            .render()
            .contains(&"✓ Funds received successfully!".to_string()));
    }
}
