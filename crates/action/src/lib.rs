pub mod approve;
pub mod pull;
pub mod track;

use alloy_primitives::{Bytes, TxHash};
use std::future::Future;

pub use approve::{Approval, ApproveAction};
pub use pull::{Pull, PullAction};
pub use track::{execute, wait_for_receipt, ReceiptPolicy, TxStatus};

/// Trait for executable onchain actions.
pub trait Action: Send + Sync {
    /// Check to see if the action is ready to be submitted.
    ///
    /// Returns true if all preconditions are met.
    fn is_ready(&self) -> impl Future<Output = eyre::Result<bool>> + Send;

    /// Broadcast the transaction.
    ///
    /// Returns the transaction hash as soon as the wallet accepts it.
    fn submit(&self) -> impl Future<Output = eyre::Result<TxHash>> + Send;

    /// ABI-encoded call sent to the token contract.
    fn calldata(&self) -> Bytes;

    /// Short machine-readable name, used as a metrics label.
    fn kind(&self) -> &'static str;

    /// Get a human-readable description of this action.
    fn description(&self) -> String;
}

/// Result of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Result {
    /// Transaction hash
    pub tx_hash: TxHash,
    /// Block number where transaction was included
    pub block_number: Option<u64>,
    /// Gas used
    pub gas_used: u64,
}
