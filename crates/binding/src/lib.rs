//! Contract bindings for the token contracts this workspace talks to.
//!
//! Only the ERC20 allowance surface is needed: decimals and allowance reads,
//! `approve` on the sender side and `transferFrom` on the receiver side.
//! Bindings are generated with alloy's `sol!` macro.

pub mod token;

pub use token::IERC20;
