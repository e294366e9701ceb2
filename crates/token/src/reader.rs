//! Token contract access.
//!
//! [`TokenReader`] covers the view calls, [`TokenWriter`] the state-changing
//! calls plus receipt lookup. [`Erc20Token`] implements both over any alloy
//! provider; a wallet-backed provider is required for the writer half.

use alloy_network::ReceiptResponse;
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::Provider;
use binding::IERC20;
use std::future::Future;
use tracing::debug;

/// Mined transaction summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptInfo {
    /// `false` if the transaction reverted
    pub success: bool,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// Read-only token calls.
pub trait TokenReader: Send + Sync {
    /// Call `decimals()` on `token`.
    fn decimals(&self, token: Address) -> impl Future<Output = eyre::Result<u8>> + Send;

    /// Call `allowance(owner, spender)` on `token`.
    fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> impl Future<Output = eyre::Result<U256>> + Send;
}

/// State-changing token calls, sent from the connected account.
pub trait TokenWriter: Send + Sync {
    /// Broadcast `approve(spender, value)` and return the transaction hash.
    fn approve(
        &self,
        token: Address,
        spender: Address,
        value: U256,
    ) -> impl Future<Output = eyre::Result<TxHash>> + Send;

    /// Broadcast `transferFrom(from, to, value)` and return the transaction hash.
    fn transfer_from(
        &self,
        token: Address,
        from: Address,
        to: Address,
        value: U256,
    ) -> impl Future<Output = eyre::Result<TxHash>> + Send;

    /// Look up the receipt; `None` while the transaction is not yet mined.
    fn receipt(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = eyre::Result<Option<ReceiptInfo>>> + Send;
}

impl<T: TokenReader + ?Sized> TokenReader for &T {
    fn decimals(&self, token: Address) -> impl Future<Output = eyre::Result<u8>> + Send {
        (**self).decimals(token)
    }

    fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> impl Future<Output = eyre::Result<U256>> + Send {
        (**self).allowance(token, owner, spender)
    }
}

impl<T: TokenWriter + ?Sized> TokenWriter for &T {
    fn approve(
        &self,
        token: Address,
        spender: Address,
        value: U256,
    ) -> impl Future<Output = eyre::Result<TxHash>> + Send {
        (**self).approve(token, spender, value)
    }

    fn transfer_from(
        &self,
        token: Address,
        from: Address,
        to: Address,
        value: U256,
    ) -> impl Future<Output = eyre::Result<TxHash>> + Send {
        (**self).transfer_from(token, from, to, value)
    }

    fn receipt(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = eyre::Result<Option<ReceiptInfo>>> + Send {
        (**self).receipt(tx_hash)
    }
}

/// ERC20 access through an alloy provider.
#[derive(Debug, Clone)]
pub struct Erc20Token<P> {
    provider: P,
}

impl<P> Erc20Token<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    pub const fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P> TokenReader for Erc20Token<P>
where
    P: Provider + Clone,
{
    async fn decimals(&self, token: Address) -> eyre::Result<u8> {
        debug!(token = %token, "Querying decimals");

        let contract = IERC20::new(token, &self.provider);
        let decimals = contract.decimals().call().await?;
        Ok(decimals)
    }

    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> eyre::Result<U256> {
        debug!(token = %token, owner = %owner, spender = %spender, "Querying allowance");

        let contract = IERC20::new(token, &self.provider);
        let amount = contract.allowance(owner, spender).call().await?;
        Ok(amount)
    }
}

impl<P> TokenWriter for Erc20Token<P>
where
    P: Provider + Clone,
{
    async fn approve(&self, token: Address, spender: Address, value: U256) -> eyre::Result<TxHash> {
        let contract = IERC20::new(token, &self.provider);
        let pending = contract.approve(spender, value).send().await?;
        Ok(*pending.tx_hash())
    }

    async fn transfer_from(
        &self,
        token: Address,
        from: Address,
        to: Address,
        value: U256,
    ) -> eyre::Result<TxHash> {
        let contract = IERC20::new(token, &self.provider);
        let pending = contract.transferFrom(from, to, value).send().await?;
        Ok(*pending.tx_hash())
    }

    async fn receipt(&self, tx_hash: TxHash) -> eyre::Result<Option<ReceiptInfo>> {
        let Some(receipt) = self.provider.get_transaction_receipt(tx_hash).await? else {
            return Ok(None);
        };

        Ok(Some(ReceiptInfo {
            success: receipt.status(),
            block_number: receipt.block_number(),
            gas_used: receipt.gas_used(),
        }))
    }
}
