//! Decimals detection.
//!
//! A detection issues `decimals()` with a small fixed number of retries and is
//! bounded by an overall timeout. Neither failure nor timeout is fatal: the
//! caller falls back to [`DEFAULT_DECIMALS`] and shows a warning, and the user
//! may still correct the field by hand.

use crate::TokenReader;
use alloy_primitives::Address;
use std::time::Duration;
use tokio_retry::{strategy::FixedInterval, Retry};
use tracing::{debug, warn};

/// Precision assumed when the token does not answer.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Retry and timeout policy for a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionConfig {
    /// Overall bound, retries included
    pub timeout: Duration,
    /// Retries after the first attempt
    pub retries: usize,
    /// Delay between attempts
    pub retry_delay: Duration,
    /// Value used on failure or timeout
    pub fallback: u8,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            retries: 2,
            retry_delay: Duration::from_secs(1),
            fallback: DEFAULT_DECIMALS,
        }
    }
}

/// Result of a detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecimalsOutcome {
    /// The token answered
    Detected(u8),
    /// Every attempt errored
    Failed(String),
    /// No answer within the timeout
    TimedOut,
}

impl DecimalsOutcome {
    /// Detected value, or `fallback` if detection did not succeed.
    pub const fn decimals(&self, fallback: u8) -> u8 {
        match self {
            Self::Detected(decimals) => *decimals,
            Self::Failed(_) | Self::TimedOut => fallback,
        }
    }

    pub const fn is_fallback(&self) -> bool {
        !matches!(self, Self::Detected(_))
    }
}

/// Detect the decimals of `token`.
pub async fn detect_decimals<R>(reader: &R, token: Address, config: &DetectionConfig) -> DecimalsOutcome
where
    R: TokenReader,
{
    let retry_strategy = FixedInterval::new(config.retry_delay).take(config.retries);

    let attempt = Retry::start(retry_strategy, || async {
        reader.decimals(token).await.map_err(|e| {
            warn!(token = %token, error = %e, "Decimals query failed, will retry");
            e
        })
    });

    match tokio::time::timeout(config.timeout, attempt).await {
        Ok(Ok(decimals)) => {
            debug!(token = %token, decimals, "Detected decimals");
            DecimalsOutcome::Detected(decimals)
        }
        Ok(Err(e)) => {
            warn!(token = %token, error = %e, fallback = config.fallback, "Failed to detect decimals");
            DecimalsOutcome::Failed(e.to_string())
        }
        Err(_) => {
            warn!(
                token = %token,
                timeout_ms = config.timeout.as_millis() as u64,
                fallback = config.fallback,
                "Decimals detection timed out"
            );
            DecimalsOutcome::TimedOut
        }
    }
}
