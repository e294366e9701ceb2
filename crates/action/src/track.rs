//! Transaction lifecycle: submit, then poll for the receipt.

use crate::Action;
use alloy_primitives::TxHash;
use std::time::Duration;
use token::{ReceiptInfo, TokenWriter};
use tracing::{debug, error, info, warn};

/// Lifecycle of a write submitted from a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TxStatus {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// Waiting for the wallet to sign and broadcast
    Pending,
    /// Broadcast, waiting for the receipt
    Confirming(TxHash),
    /// Mined successfully
    Confirmed(TxHash),
    /// Rejected by the wallet, reverted, or never mined
    Failed(String),
}

impl TxStatus {
    /// A write is in flight; the submit control must stay disabled.
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirming(_))
    }

    pub const fn tx_hash(&self) -> Option<TxHash> {
        match self {
            Self::Confirming(hash) | Self::Confirmed(hash) => Some(*hash),
            Self::Idle | Self::Pending | Self::Failed(_) => None,
        }
    }
}

/// Shortest poll interval used, whatever the policy says.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// How receipts are polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPolicy {
    pub poll_interval: Duration,
    /// Give up after this long without a receipt
    pub timeout: Duration,
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            timeout: Duration::from_secs(600),
        }
    }
}

/// Poll until the transaction is mined.
///
/// Lookup errors are logged and polling continues until `policy.timeout`.
pub async fn wait_for_receipt<W>(
    writer: &W,
    tx_hash: TxHash,
    policy: &ReceiptPolicy,
) -> eyre::Result<ReceiptInfo>
where
    W: TokenWriter,
{
    let poll = async {
        let mut interval = tokio::time::interval(policy.poll_interval.max(MIN_POLL_INTERVAL));
        loop {
            interval.tick().await;
            match writer.receipt(tx_hash).await {
                Ok(Some(receipt)) => return receipt,
                Ok(None) => debug!(tx_hash = %tx_hash, "Receipt not available yet"),
                Err(e) => warn!(tx_hash = %tx_hash, error = %e, "Receipt lookup failed, will retry"),
            }
        }
    };

    tokio::time::timeout(policy.timeout, poll)
        .await
        .map_err(|_| eyre::eyre!("Timed out waiting for receipt of {}", tx_hash))
}

/// Submit `action` and follow it to a receipt, reporting every transition.
///
/// `on_status` sees Pending, then Confirming(hash), then Confirmed(hash) or
/// Failed. Errors are reported through `on_status` before being returned.
pub async fn execute<A, W, F>(
    action: &A,
    writer: &W,
    policy: &ReceiptPolicy,
    mut on_status: F,
) -> eyre::Result<crate::Result>
where
    A: Action,
    W: TokenWriter,
    F: FnMut(&TxStatus),
{
    info!(action = action.kind(), "{}", action.description());
    on_status(&TxStatus::Pending);

    let tx_hash = match action.submit().await {
        Ok(tx_hash) => tx_hash,
        Err(e) => {
            error!(action = action.kind(), error = %e, "Submission failed");
            on_status(&TxStatus::Failed(e.to_string()));
            return Err(e);
        }
    };

    on_status(&TxStatus::Confirming(tx_hash));

    let receipt = match wait_for_receipt(writer, tx_hash, policy).await {
        Ok(receipt) => receipt,
        Err(e) => {
            error!(tx_hash = %tx_hash, error = %e, "No receipt");
            on_status(&TxStatus::Failed(e.to_string()));
            return Err(e);
        }
    };

    if !receipt.success {
        error!(tx_hash = %tx_hash, block_number = receipt.block_number, "Transaction reverted");
        on_status(&TxStatus::Failed("Transaction reverted".to_string()));
        eyre::bail!("Transaction {} reverted", tx_hash);
    }

    info!(
        tx_hash = %tx_hash,
        block_number = receipt.block_number,
        gas_used = receipt.gas_used,
        "Transaction confirmed."
    );
    on_status(&TxStatus::Confirmed(tx_hash));

    Ok(crate::Result {
        tx_hash,
        block_number: receipt.block_number,
        gas_used: receipt.gas_used,
    })
}
