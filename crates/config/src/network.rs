//! Network configuration for the token flows.
//!
//! Token addresses are user input, so a network only contributes the chain id
//! used to sanity-check the RPC endpoint and the explorer used for links.

use alloy_primitives::TxHash;
use serde::{Deserialize, Serialize};

/// Supported networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkType {
    Mainnet,
    Sepolia,
    Base,
    BaseSepolia,
    Optimism,
    Arbitrum,
}

/// Chain parameters for a network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Network type
    pub network_type: NetworkType,
    /// Chain ID reported by `eth_chainId`
    pub chain_id: u64,
    /// Block explorer base url, without trailing slash
    pub explorer_url: &'static str,
}

impl NetworkConfig {
    /// Ethereum mainnet configuration.
    pub const fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            chain_id: 1,
            explorer_url: "https://etherscan.io",
        }
    }

    /// Ethereum Sepolia testnet configuration.
    pub const fn sepolia() -> Self {
        Self {
            network_type: NetworkType::Sepolia,
            chain_id: 11155111,
            explorer_url: "https://sepolia.etherscan.io",
        }
    }

    pub const fn base() -> Self {
        Self {
            network_type: NetworkType::Base,
            chain_id: 8453,
            explorer_url: "https://basescan.org",
        }
    }

    pub const fn base_sepolia() -> Self {
        Self {
            network_type: NetworkType::BaseSepolia,
            chain_id: 84532,
            explorer_url: "https://sepolia.basescan.org",
        }
    }

    pub const fn optimism() -> Self {
        Self {
            network_type: NetworkType::Optimism,
            chain_id: 10,
            explorer_url: "https://optimistic.etherscan.io",
        }
    }

    pub const fn arbitrum() -> Self {
        Self {
            network_type: NetworkType::Arbitrum,
            chain_id: 42161,
            explorer_url: "https://arbiscan.io",
        }
    }

    /// Create configuration from network type.
    pub const fn from_network_type(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Mainnet => Self::mainnet(),
            NetworkType::Sepolia => Self::sepolia(),
            NetworkType::Base => Self::base(),
            NetworkType::BaseSepolia => Self::base_sepolia(),
            NetworkType::Optimism => Self::optimism(),
            NetworkType::Arbitrum => Self::arbitrum(),
        }
    }

    /// Explorer page for a transaction.
    pub fn tx_url(&self, tx_hash: TxHash) -> String {
        format!("{}/tx/{}", self.explorer_url, tx_hash)
    }
}

/// Builder for custom network configurations.
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
    config: NetworkConfig,
}

impl NetworkConfigBuilder {
    /// Start from a preset.
    pub const fn new(network_type: NetworkType) -> Self {
        Self {
            config: NetworkConfig::from_network_type(network_type),
        }
    }

    /// Override the expected chain id (local forks, devnets).
    pub const fn chain_id(mut self, chain_id: u64) -> Self {
        self.config.chain_id = chain_id;
        self
    }

    /// Override the block explorer.
    pub const fn explorer_url(mut self, url: &'static str) -> Self {
        self.config.explorer_url = url;
        self
    }

    /// Build the network configuration.
    pub const fn build(self) -> NetworkConfig {
        self.config
    }
}
