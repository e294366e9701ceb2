//! Grant Allowance panel.

use crate::{busy_label, or_placeholder, DecimalsField, DecimalsRequest, FormError, RequestId};
use action::{Approval, TxStatus};
use alloy_primitives::Address;
use token::{parse_address, parse_units, DecimalsOutcome};

/// Sender panel: approve the receiver to pull an amount.
#[derive(Debug)]
pub struct SenderView {
    account: Option<Address>,
    token: DecimalsField,
    receiver_address: String,
    amount: String,
    tx: TxStatus,
}

impl SenderView {
    pub fn new(account: Option<Address>, fallback_decimals: u8) -> Self {
        Self {
            account,
            token: DecimalsField::new(fallback_decimals),
            receiver_address: String::new(),
            amount: String::new(),
            tx: TxStatus::Idle,
        }
    }

    pub const fn set_account(&mut self, account: Option<Address>) {
        self.account = account;
    }

    pub fn set_token_address(&mut self, value: impl Into<String>) -> Option<DecimalsRequest> {
        self.token.set_token_address(value)
    }

    pub fn apply_decimals(&mut self, id: RequestId, outcome: &DecimalsOutcome) -> bool {
        self.token.apply(id, outcome)
    }

    pub fn set_receiver_address(&mut self, value: impl Into<String>) {
        self.receiver_address = value.into();
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

    pub const fn can_submit(&self) -> bool {
        self.account.is_some() && !self.tx.is_busy()
    }

    /// Validate the form into an approval.
    pub fn submit(&self) -> Result<Approval, FormError> {
        if self.account.is_none() {
            return Err(FormError::NotConnected);
        }
        if self.tx.is_busy() {
            return Err(FormError::Busy);
        }

        let fields = [
            self.token.token_address(),
            self.receiver_address.as_str(),
            self.amount.as_str(),
        ];
        if fields.iter().any(|field| field.trim().is_empty()) {
            return Err(FormError::MissingFields);
        }

        let token = parse_address(self.token.token_address())
            .map_err(|source| FormError::InvalidAddress { field: "token", source })?;
        let spender = parse_address(&self.receiver_address)
            .map_err(|source| FormError::InvalidAddress { field: "receiver", source })?;

        let decimals = self.token.decimals()?;
        let amount = parse_units(&self.amount, decimals)?;

        Ok(Approval {
            token,
            spender,
            amount,
            decimals,
        })
    }

    pub fn render(&self) -> Vec<String> {
        if self.account.is_none() {
            return vec!["Please connect your wallet to continue".to_string()];
        }

        let mut lines = vec![
            "Grant Allowance (Sender)".to_string(),
            String::new(),
            format!(
                "Token Contract Address: {}",
                or_placeholder(self.token.token_address(), "0x...")
            ),
        ];

        let mut token_help = "  The ERC20 token you want to transfer".to_string();
        if let Some(hint) = self.token.hint() {
            token_help.push_str("  ");
            token_help.push_str(&hint);
        }
        lines.push(token_help);

        lines.push(format!(
            "Receiver Address: {}",
            or_placeholder(&self.receiver_address, "0x...")
        ));
        lines.push("  Double-check this address! The receiver will pull funds from you.".to_string());
        lines.push(format!(
            "Amount: {}    Decimals: {}",
            or_placeholder(&self.amount, "1000"),
            self.token.decimals_text()
        ));

        let label = busy_label(&self.tx).unwrap_or("Approve Allowance");
        if self.can_submit() {
            lines.push(format!("[ {label} ]"));
        } else {
            lines.push(format!("[ {label} ] (disabled)"));
        }

        if let Some(hash) = self.tx.tx_hash() {
            lines.push(String::new());
            lines.push(format!("Transaction Hash: {hash}"));
        }

        match &self.tx {
            TxStatus::Confirmed(_) => {
                lines.push("✓ Allowance granted successfully!".to_string());
                lines.push(
                    "  The receiver can now pull the funds. If you made a mistake with the \
                     address, you can revoke by approving 0 tokens to that address."
                        .to_string(),
                );
            }
            TxStatus::Failed(reason) => {
                lines.push(format!("✗ Error approving tokens: {reason}"));
            }
            _ => {}
        }

        lines.extend(
            [
                "",
                "How it works:",
                "  1. You grant an allowance to the receiver's address",
                "  2. The receiver pulls the funds using transferFrom",
                "  3. If you entered the wrong address, likely no one controls that address so you'll keep your tokens",
                "  4. You can then revoke the allowance and grant it to the correct address",
            ]
            .map(String::from),
        );

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{TxHash, U256};

    const TOKEN: &str = "0x1111111111111111111111111111111111111111";
    const RECEIVER: &str = "0x2222222222222222222222222222222222222222";

    fn connected() -> SenderView {
        SenderView::new(Some(Address::repeat_byte(9)), 18)
    }

    fn filled(decimals: u8) -> SenderView {
        let mut view = connected();
        let request = view.set_token_address(TOKEN).unwrap();
        view.apply_decimals(request.id, &DecimalsOutcome::Detected(decimals));
        view.set_receiver_address(RECEIVER);
        view.set_amount("100");
        view
    }

    #[test]
    fn test_submit_scales_amount_by_detected_decimals() {
        let approval = filled(6).submit().unwrap();

        assert_eq!(approval.token, Address::repeat_byte(0x11));
        assert_eq!(approval.spender, Address::repeat_byte(0x22));
        assert_eq!(approval.amount, U256::from(100_000_000u64));
        assert_eq!(approval.decimals, 6);
    }

    #[test]
    fn test_manual_decimals_override() {
        let mut view = filled(6);
        view.set_decimals("2");
        assert_eq!(view.submit().unwrap().amount, U256::from(10_000));
    }

    #[test]
    fn test_missing_fields() {
        let mut view = connected();
        view.set_token_address(TOKEN);
        view.set_amount("1");
        assert_eq!(view.submit(), Err(FormError::MissingFields));
    }

    #[test]
    fn test_not_connected() {
        let mut view = filled(6);
        view.set_account(None);
        assert_eq!(view.submit(), Err(FormError::NotConnected));
        assert_eq!(view.render(), vec!["Please connect your wallet to continue"]);
    }

    #[test]
    fn test_invalid_receiver() {
        let mut view = filled(6);
        view.set_receiver_address("0xReceiver");
        assert!(matches!(
            view.submit(),
            Err(FormError::InvalidAddress { field: "receiver", .. })
        ));
    }

    #[test]
    fn test_unparseable_amount() {
        let mut view = filled(6);
        view.set_amount("1.0000001");
        assert!(matches!(view.submit(), Err(FormError::InvalidAmount(_))));
    }

    #[test]
    fn test_busy_blocks_resubmission() {
        let mut view = filled(6);
        view.set_tx_status(TxStatus::Pending);

        assert!(!view.can_submit());
        assert_eq!(view.submit(), Err(FormError::Busy));
        assert!(view.render().contains(&"[ Confirming... ] (disabled)".to_string()));

        view.set_tx_status(TxStatus::Confirming(TxHash::repeat_byte(1)));
        assert!(view
            .render()
            .contains(&"[ Waiting for confirmation... ] (disabled)".to_string()));
    }

    #[test]
    fn test_render_confirmed() {
        let mut view = filled(6);
        let hash = TxHash::repeat_byte(0xab);
        view.set_tx_status(TxStatus::Confirmed(hash));

        let lines = view.render();
        assert!(lines.contains(&"[ Approve Allowance ]".to_string()));
        assert!(lines.contains(&format!("Transaction Hash: {hash}")));
        assert!(lines.contains(&"✓ Allowance granted successfully!".to_string()));
    }

    #[test]
    fn test_render_detection_hint() {
        let mut view = connected();
        let request = view.set_token_address(TOKEN).unwrap();
        assert!(view.render()[3].ends_with("Detecting decimals..."));

        view.apply_decimals(request.id, &DecimalsOutcome::Failed("reverted".into()));
        assert!(view.render()[3].ends_with("Failed to detect decimals. Using default (18)."));
    }
}
