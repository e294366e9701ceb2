//! Configuration types for the safe-transfers tools.
//!
//! This crate provides:
//! - Network presets (chain id, block explorer) for supported chains
//! - A builder for custom or forked deployments

pub mod network;

pub use network::{NetworkConfig, NetworkConfigBuilder, NetworkType};
