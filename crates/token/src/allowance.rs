//! Allowance checks.
//!
//! An allowance is scoped to (token, owner, spender). The check only runs once
//! all three are known, and its result is advisory: the owner can change the
//! allowance between the check and a later `transferFrom`.

use crate::{parse_address, TokenReader};
use alloy_primitives::{Address, U256};
use tracing::debug;

/// Which allowance to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowanceQuery {
    pub token: Address,
    /// Account that granted the allowance (the sender)
    pub owner: Address,
    /// Account allowed to pull (the receiver)
    pub spender: Address,
}

impl AllowanceQuery {
    /// Build a query from form input.
    ///
    /// Returns `None` unless both addresses are valid and the connected
    /// account is known; no read should be issued in that case.
    pub fn from_inputs(token: &str, owner: &str, account: Option<Address>) -> Option<Self> {
        let token = parse_address(token).ok()?;
        let owner = parse_address(owner).ok()?;
        let spender = account?;

        Some(Self {
            token,
            owner,
            spender,
        })
    }
}

/// Allowance read at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allowance {
    pub query: AllowanceQuery,
    pub amount: U256,
}

impl Allowance {
    pub fn has_allowance(&self) -> bool {
        self.amount > U256::ZERO
    }

    /// Whether `amount` base units can be pulled under this allowance.
    pub fn covers(&self, amount: U256) -> bool {
        amount <= self.amount
    }
}

/// Read the allowance described by `query`.
pub async fn check_allowance<R>(reader: &R, query: AllowanceQuery) -> eyre::Result<Allowance>
where
    R: TokenReader,
{
    let amount = reader
        .allowance(query.token, query.owner, query.spender)
        .await?;

    debug!(
        token = %query.token,
        owner = %query.owner,
        spender = %query.spender,
        amount = %amount,
        "Allowance checked"
    );

    Ok(Allowance { query, amount })
}
