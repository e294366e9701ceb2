use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_sol_types::SolCall;
use binding::IERC20;
use token::{format_units, TokenWriter};
use tracing::info;

/// Approve input data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approval {
    /// ERC20 token contract
    pub token: Address,
    /// Receiver who will later pull with `transferFrom`
    pub spender: Address,
    /// New allowance in base units; replaces any previous value
    pub amount: U256,
    /// Token precision, only used for display
    pub decimals: u8,
}

impl Approval {
    /// Approval of zero, which revokes a mistaken allowance.
    pub const fn revoke(token: Address, spender: Address, decimals: u8) -> Self {
        Self {
            token,
            spender,
            amount: U256::ZERO,
            decimals,
        }
    }

    pub fn is_revoke(&self) -> bool {
        self.amount == U256::ZERO
    }
}

/// Grants the receiver an allowance over the connected account's tokens.
///
/// The current allowance is not checked first: `approve` overwrites it.
pub struct ApproveAction<C> {
    client: C,
    approval: Approval,
}

impl<C> ApproveAction<C>
where
    C: TokenWriter,
{
    pub const fn new(client: C, approval: Approval) -> Self {
        Self { client, approval }
    }

    pub const fn approval(&self) -> &Approval {
        &self.approval
    }

    fn validate_approval(&self) -> eyre::Result<()> {
        if self.approval.token == Address::ZERO {
            eyre::bail!("Token must not be zero");
        }

        if self.approval.spender == Address::ZERO {
            eyre::bail!("Spender must not be zero");
        }

        Ok(())
    }
}

impl<C> crate::Action for ApproveAction<C>
where
    C: TokenWriter,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        Ok(self.validate_approval().is_ok())
    }

    async fn submit(&self) -> eyre::Result<TxHash> {
        self.validate_approval()?;

        let tx_hash = self
            .client
            .approve(self.approval.token, self.approval.spender, self.approval.amount)
            .await?;

        info!(
            tx_hash = %tx_hash,
            token = %self.approval.token,
            spender = %self.approval.spender,
            amount = %self.approval.amount,
            "Approval submitted."
        );

        Ok(tx_hash)
    }

    fn calldata(&self) -> Bytes {
        IERC20::approveCall {
            spender: self.approval.spender,
            value: self.approval.amount,
        }
        .abi_encode()
        .into()
    }

    fn kind(&self) -> &'static str {
        "approve"
    }

    fn description(&self) -> String {
        if self.approval.is_revoke() {
            return format!(
                "Revoke allowance of {} on token {}",
                self.approval.spender, self.approval.token
            );
        }

        format!(
            "Approve {} to pull {} of token {}",
            self.approval.spender,
            format_units(self.approval.amount, self.approval.decimals),
            self.approval.token,
        )
    }
}
