use crate::Settings;
use action::ReceiptPolicy;
use config::{NetworkConfig, NetworkConfigBuilder, NetworkType};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use token::DetectionConfig;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RPC endpoint url
    pub rpc_url: String,

    /// Network the RPC endpoint serves
    pub network: NetworkType,

    /// Expected chain id, overriding the network preset (forks, devnets)
    #[serde(default)]
    pub chain_id: Option<u64>,

    /// Decimals detection policy
    #[serde(default)]
    pub decimals: DecimalsSettings,

    /// Receipt polling interval in milliseconds
    #[serde(default = "default_receipt_poll_ms")]
    pub receipt_poll_ms: u64,

    /// Give up waiting for a receipt after this many seconds
    #[serde(default = "default_receipt_timeout_secs")]
    pub receipt_timeout_secs: u64,

    /// Serve Prometheus metrics on this port
    #[serde(default)]
    pub metrics_port: Option<u16>,

    /// Validate and log actions without submitting transactions
    #[serde(default)]
    pub dry_run: bool,
}

/// `[decimals]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecimalsSettings {
    pub timeout_secs: u64,
    pub retries: usize,
    pub retry_delay_ms: u64,
    pub fallback: u8,
}

impl Default for DecimalsSettings {
    fn default() -> Self {
        let detection = DetectionConfig::default();
        Self {
            timeout_secs: detection.timeout.as_secs(),
            retries: detection.retries,
            retry_delay_ms: detection.retry_delay.as_millis() as u64,
            fallback: detection.fallback,
        }
    }
}

const fn default_receipt_poll_ms() -> u64 {
    1_000
}

const fn default_receipt_timeout_secs() -> u64 {
    600
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;

        Ok(config)
    }

    /// Reject values that would stall or break a flow after it has started.
    pub fn validate(&self) -> eyre::Result<()> {
        if self.receipt_poll_ms == 0 {
            eyre::bail!("receipt_poll_ms must be greater than zero");
        }

        if self.receipt_timeout_secs == 0 {
            eyre::bail!("receipt_timeout_secs must be greater than zero");
        }

        if self.decimals.timeout_secs == 0 {
            eyre::bail!("decimals.timeout_secs must be greater than zero");
        }

        Ok(())
    }

    pub fn network_config(&self) -> NetworkConfig {
        let builder = NetworkConfigBuilder::new(self.network);
        match self.chain_id {
            Some(chain_id) => builder.chain_id(chain_id).build(),
            None => builder.build(),
        }
    }

    pub const fn detection_config(&self) -> DetectionConfig {
        DetectionConfig {
            timeout: Duration::from_secs(self.decimals.timeout_secs),
            retries: self.decimals.retries,
            retry_delay: Duration::from_millis(self.decimals.retry_delay_ms),
            fallback: self.decimals.fallback,
        }
    }

    pub const fn receipt_policy(&self) -> ReceiptPolicy {
        ReceiptPolicy {
            poll_interval: Duration::from_millis(self.receipt_poll_ms),
            timeout: Duration::from_secs(self.receipt_timeout_secs),
        }
    }

    pub const fn settings(&self) -> Settings {
        Settings {
            detection: self.detection_config(),
            receipt: self.receipt_policy(),
            dry_run: self.dry_run,
        }
    }
}
