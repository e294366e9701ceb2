use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_sol_types::SolCall;
use binding::IERC20;
use token::{format_units, TokenReader, TokenWriter};
use tracing::{info, warn};

/// Pull input data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pull {
    /// ERC20 token contract
    pub token: Address,
    /// Sender who granted the allowance
    pub owner: Address,
    /// Connected account; both spender and recipient
    pub recipient: Address,
    /// Amount in base units
    pub amount: U256,
    /// Token precision, only used for display
    pub decimals: u8,
}

/// Pulls funds from the owner with `transferFrom(owner, recipient, amount)`.
pub struct PullAction<C> {
    client: C,
    pull: Pull,
}

impl<C> PullAction<C>
where
    C: TokenReader + TokenWriter,
{
    pub const fn new(client: C, pull: Pull) -> Self {
        Self { client, pull }
    }

    pub const fn pull(&self) -> &Pull {
        &self.pull
    }

    fn validate_pull(&self) -> eyre::Result<()> {
        if self.pull.token == Address::ZERO {
            eyre::bail!("Token must not be zero");
        }

        if self.pull.owner == Address::ZERO {
            eyre::bail!("Owner must not be zero");
        }

        if self.pull.recipient == Address::ZERO {
            eyre::bail!("Recipient must not be zero");
        }

        if self.pull.amount == U256::ZERO {
            eyre::bail!("Amount must not be zero");
        }

        Ok(())
    }

    /// Live allowance of the recipient over the owner's tokens.
    pub async fn current_allowance(&self) -> eyre::Result<U256> {
        self.client
            .allowance(self.pull.token, self.pull.owner, self.pull.recipient)
            .await
    }
}

impl<C> crate::Action for PullAction<C>
where
    C: TokenReader + TokenWriter,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        if self.validate_pull().is_err() {
            return Ok(false);
        }

        // The owner may have changed the allowance since the form checked it.
        let allowance = self.current_allowance().await?;
        if allowance < self.pull.amount {
            warn!(
                allowance = %allowance,
                amount = %self.pull.amount,
                "Allowance no longer covers the pull"
            );
            return Ok(false);
        }

        Ok(true)
    }

    async fn submit(&self) -> eyre::Result<TxHash> {
        self.validate_pull()?;

        let tx_hash = self
            .client
            .transfer_from(
                self.pull.token,
                self.pull.owner,
                self.pull.recipient,
                self.pull.amount,
            )
            .await?;

        info!(
            tx_hash = %tx_hash,
            token = %self.pull.token,
            owner = %self.pull.owner,
            recipient = %self.pull.recipient,
            amount = %self.pull.amount,
            "Pull submitted."
        );

        Ok(tx_hash)
    }

    fn calldata(&self) -> Bytes {
        IERC20::transferFromCall {
            from: self.pull.owner,
            to: self.pull.recipient,
            value: self.pull.amount,
        }
        .abi_encode()
        .into()
    }

    fn kind(&self) -> &'static str {
        "transfer_from"
    }

    fn description(&self) -> String {
        format!(
            "Pull {} of token {} from {} to {}",
            format_units(self.pull.amount, self.pull.decimals),
            self.pull.token,
            self.pull.owner,
            self.pull.recipient,
        )
    }
}
