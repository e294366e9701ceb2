//! In-memory token shared across integration tests.
#![allow(dead_code)] // not every test file uses every helper

use alloy_primitives::{address, Address, TxHash, U256};
use safe_transfer::metrics::Metrics;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};
use token::{ReceiptInfo, TokenReader, TokenWriter};

pub const TOKEN: Address = address!("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
pub const SENDER: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
pub const RECEIVER: Address = address!("0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");

pub const APPROVE_HASH: TxHash = TxHash::repeat_byte(0xa1);
pub const PULL_HASH: TxHash = TxHash::repeat_byte(0xb2);

/// How `decimals()` answers.
#[derive(Debug, Clone, Copy)]
pub enum DecimalsReply {
    Value(u8),
    Error,
    /// Never resolves
    Hang,
}

/// Transaction broadcast through the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Approve { spender: Address, value: U256 },
    TransferFrom { from: Address, to: Address, value: U256 },
}

/// Token double with call counters.
///
/// Transactions mine immediately; `reverts` makes every receipt a revert.
/// A successful `approve` updates the stored allowance and a successful
/// `transferFrom` spends from it, as the contract would.
pub struct FakeToken {
    pub decimals: DecimalsReply,
    pub allowance: Mutex<U256>,
    pub reverts: bool,
    pub decimals_calls: AtomicUsize,
    pub allowance_calls: AtomicUsize,
    sent: Mutex<Vec<Sent>>,
}

impl FakeToken {
    pub fn new(decimals: DecimalsReply, allowance: U256) -> Self {
        Self {
            decimals,
            allowance: Mutex::new(allowance),
            reverts: false,
            decimals_calls: AtomicUsize::new(0),
            allowance_calls: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn reverting(mut self) -> Self {
        self.reverts = true;
        self
    }

    pub fn set_allowance(&self, amount: U256) {
        *self.allowance.lock().unwrap() = amount;
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn reads(&self) -> usize {
        self.decimals_calls.load(Ordering::SeqCst) + self.allowance_calls.load(Ordering::SeqCst)
    }
}

impl TokenReader for FakeToken {
    async fn decimals(&self, _token: Address) -> eyre::Result<u8> {
        self.decimals_calls.fetch_add(1, Ordering::SeqCst);
        match self.decimals {
            DecimalsReply::Value(decimals) => Ok(decimals),
            DecimalsReply::Error => eyre::bail!("execution reverted"),
            DecimalsReply::Hang => std::future::pending().await,
        }
    }

    async fn allowance(&self, _token: Address, _owner: Address, _spender: Address) -> eyre::Result<U256> {
        self.allowance_calls.fetch_add(1, Ordering::SeqCst);
        Ok(*self.allowance.lock().unwrap())
    }
}

impl TokenWriter for FakeToken {
    async fn approve(&self, _token: Address, spender: Address, value: U256) -> eyre::Result<TxHash> {
        self.sent.lock().unwrap().push(Sent::Approve { spender, value });
        if !self.reverts {
            self.set_allowance(value);
        }
        Ok(APPROVE_HASH)
    }

    async fn transfer_from(
        &self,
        _token: Address,
        from: Address,
        to: Address,
        value: U256,
    ) -> eyre::Result<TxHash> {
        self.sent.lock().unwrap().push(Sent::TransferFrom { from, to, value });
        if !self.reverts {
            let mut allowance = self.allowance.lock().unwrap();
            *allowance = allowance.saturating_sub(value);
        }
        Ok(PULL_HASH)
    }

    async fn receipt(&self, _tx_hash: TxHash) -> eyre::Result<Option<ReceiptInfo>> {
        Ok(Some(ReceiptInfo {
            success: !self.reverts,
            block_number: Some(1),
            gas_used: 46_000,
        }))
    }
}

pub fn metrics() -> Metrics {
    Metrics::new()
}

pub fn hex(address: Address) -> String {
    address.to_checksum(None)
}
