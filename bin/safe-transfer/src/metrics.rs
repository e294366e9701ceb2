//! Prometheus metrics for the transfer flows.
//!
//! All metrics are recorded through the [`Metrics`] struct; nothing is
//! exported unless [`install_prometheus_exporter`] is called.

use metrics::{counter, describe_counter, describe_gauge, gauge};

#[derive(Debug, Clone)]
pub struct Metrics {
    _private: (),
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics instance and register all metric descriptions.
    pub fn new() -> Self {
        Self::register_descriptions();
        Self { _private: () }
    }

    fn register_descriptions() {
        describe_counter!(
            "safe_transfer_decimals_detections_total",
            "Decimals detections by outcome (detected, failed, timed_out)"
        );
        describe_counter!(
            "safe_transfer_submissions_blocked_total",
            "Form submissions blocked client-side by action and reason"
        );
        describe_counter!(
            "safe_transfer_tx_submitted_total",
            "Transactions accepted by the wallet by action"
        );
        describe_counter!(
            "safe_transfer_tx_confirmed_total",
            "Transactions mined successfully by action"
        );
        describe_counter!(
            "safe_transfer_tx_failed_total",
            "Transactions rejected, reverted or never mined by action"
        );
        describe_gauge!(
            "safe_transfer_allowance_base_units",
            "Last observed allowance in base units"
        );
    }

    pub fn record_decimals_detection(&self, outcome: &token::DecimalsOutcome) {
        let label = match outcome {
            token::DecimalsOutcome::Detected(_) => "detected",
            token::DecimalsOutcome::Failed(_) => "failed",
            token::DecimalsOutcome::TimedOut => "timed_out",
        };
        counter!("safe_transfer_decimals_detections_total", "outcome" => label).increment(1);
    }

    pub fn record_blocked(&self, action: &'static str, reason: &'static str) {
        counter!(
            "safe_transfer_submissions_blocked_total",
            "action" => action,
            "reason" => reason
        )
        .increment(1);
    }

    pub fn record_submitted(&self, action: &'static str) {
        counter!("safe_transfer_tx_submitted_total", "action" => action).increment(1);
    }

    pub fn record_confirmed(&self, action: &'static str) {
        counter!("safe_transfer_tx_confirmed_total", "action" => action).increment(1);
    }

    pub fn record_failed(&self, action: &'static str) {
        counter!("safe_transfer_tx_failed_total", "action" => action).increment(1);
    }

    pub fn set_allowance(&self, amount: u128) {
        gauge!("safe_transfer_allowance_base_units").set(amount as f64);
    }
}

/// Install the Prometheus metrics exporter and start the HTTP server.
///
/// Returns an error if the server fails to bind to the specified port.
pub fn install_prometheus_exporter(port: u16) -> eyre::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::net::SocketAddr;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| eyre::eyre!("Failed to install Prometheus exporter: {}", e))?;

    Ok(())
}
