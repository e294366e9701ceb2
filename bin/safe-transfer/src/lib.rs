pub mod config;
pub mod metrics;

use crate::metrics::Metrics;
use action::{
    execute, track::MIN_POLL_INTERVAL, Action, ApproveAction, PullAction, ReceiptPolicy, TxStatus,
};
use alloy_primitives::U256;
use std::time::Duration;
use token::{
    check_allowance, detect_decimals, format_units, Allowance, AllowanceQuery, DecimalsOutcome,
    DetectionConfig, TokenReader, TokenWriter,
};
use tracing::{error, info, warn};
use view::{DecimalsRequest, FormError, ReceiverView, SenderView};

/// Runtime policy shared by the flows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    pub detection: DetectionConfig,
    pub receipt: ReceiptPolicy,
    /// Validate and log the call instead of submitting it
    pub dry_run: bool,
}

/// Sender form input.
#[derive(Debug, Clone, Default)]
pub struct SenderInput {
    pub token: String,
    pub receiver: String,
    pub amount: String,
    /// Manual decimals, skipping detection; detection is used when absent
    pub decimals: Option<String>,
}

/// Receiver form input.
#[derive(Debug, Clone, Default)]
pub struct ReceiverInput {
    pub token: String,
    pub sender: String,
    pub amount: String,
    /// Manual decimals, skipping detection; detection is used when absent
    pub decimals: Option<String>,
}

/// Run a decimals detection requested by a view.
pub async fn detect<R>(
    reader: &R,
    request: DecimalsRequest,
    detection: &DetectionConfig,
    metrics: &Metrics,
) -> DecimalsOutcome
where
    R: TokenReader,
{
    let outcome = detect_decimals(reader, request.token, detection).await;
    metrics.record_decimals_detection(&outcome);
    outcome
}

/// Read the allowance for the receiver's current inputs.
///
/// Returns false if the inputs are incomplete and no read was issued.
pub async fn refresh_allowance<R>(reader: &R, view: &mut ReceiverView) -> bool
where
    R: TokenReader,
{
    let Some(request) = view.refresh_allowance() else {
        return false;
    };

    let result = check_allowance(reader, request.query)
        .await
        .map(|allowance| allowance.amount)
        .map_err(|e| {
            warn!(error = %e, "Allowance check failed");
            e.to_string()
        });

    view.apply_allowance(request.id, result);
    true
}

/// Fill the sender form from `input` and run the approval.
///
/// Validation failures are returned as errors before anything is sent. A
/// failed transaction is reflected in the view's status instead.
pub async fn run_sender<C>(
    client: &C,
    view: &mut SenderView,
    input: SenderInput,
    settings: &Settings,
    metrics: &Metrics,
) -> eyre::Result<()>
where
    C: TokenReader + TokenWriter,
{
    let request = view.set_token_address(input.token);
    match (input.decimals, request) {
        (Some(decimals), _) => view.override_decimals(decimals),
        (None, Some(request)) => {
            let outcome = detect(client, request, &settings.detection, metrics).await;
            view.apply_decimals(request.id, &outcome);
        }
        (None, None) => {}
    }
    view.set_receiver_address(input.receiver);
    view.set_amount(input.amount);

    let approval = view
        .submit()
        .inspect_err(|e| record_blocked(metrics, "approve", e))?;

    let action = ApproveAction::new(client, approval);
    if settings.dry_run {
        info!(call = %action.calldata(), "Dry run: {}", action.description());
        return Ok(());
    }

    track(&action, client, &settings.receipt, metrics, |status| {
        view.set_tx_status(status.clone())
    })
    .await;

    Ok(())
}

/// Fill the receiver form from `input`, check the allowance and run the pull.
///
/// Client-side blocks (missing allowance, amount over allowance) are returned
/// as errors. A failed transaction is reflected in the view's status instead.
pub async fn run_receiver<C>(
    client: &C,
    view: &mut ReceiverView,
    input: ReceiverInput,
    settings: &Settings,
    metrics: &Metrics,
) -> eyre::Result<()>
where
    C: TokenReader + TokenWriter,
{
    let request = view.set_token_address(input.token);
    match (input.decimals, request) {
        (Some(decimals), _) => view.override_decimals(decimals),
        (None, Some(request)) => {
            let outcome = detect(client, request, &settings.detection, metrics).await;
            view.apply_decimals(request.id, &outcome);
        }
        (None, None) => {}
    }
    view.set_sender_address(input.sender);
    view.set_amount(input.amount);

    refresh_allowance(client, view).await;

    let pull = view
        .submit()
        .inspect_err(|e| record_blocked(metrics, "transfer_from", e))?;

    let action = PullAction::new(client, pull);
    if !action.is_ready().await? {
        metrics.record_blocked("transfer_from", "allowance_changed");
        eyre::bail!("Allowance changed since it was checked. Refresh and try again.");
    }

    if settings.dry_run {
        info!(call = %action.calldata(), "Dry run: {}", action.description());
        return Ok(());
    }

    track(&action, client, &settings.receipt, metrics, |status| {
        view.set_tx_status(status.clone())
    })
    .await;

    Ok(())
}

/// Poll an allowance until cancelled, calling `on_change` whenever it differs
/// from the previous read.
pub async fn watch_allowance<R, F>(
    reader: &R,
    query: AllowanceQuery,
    decimals: u8,
    interval: Duration,
    metrics: &Metrics,
    mut on_change: F,
) where
    R: TokenReader,
    F: FnMut(&Allowance),
{
    let mut ticker = tokio::time::interval(interval.max(MIN_POLL_INTERVAL));
    let mut last: Option<U256> = None;

    loop {
        ticker.tick().await;

        match check_allowance(reader, query).await {
            Ok(allowance) => {
                metrics.set_allowance(u128::try_from(allowance.amount).unwrap_or(u128::MAX));

                if last != Some(allowance.amount) {
                    info!(
                        owner = %query.owner,
                        spender = %query.spender,
                        allowance = %format_units(allowance.amount, decimals),
                        "Allowance changed"
                    );
                    last = Some(allowance.amount);
                    on_change(&allowance);
                }
            }
            Err(e) => error!(error = %e, "Failed to check allowance"),
        }
    }
}

async fn track<A, W, F>(action: &A, writer: &W, policy: &ReceiptPolicy, metrics: &Metrics, mut on_status: F)
where
    A: Action,
    W: TokenWriter,
    F: FnMut(&TxStatus),
{
    let kind = action.kind();
    let result = execute(action, writer, policy, |status| {
        if matches!(status, TxStatus::Confirming(_)) {
            metrics.record_submitted(kind);
        }
        on_status(status);
    })
    .await;

    match result {
        Ok(_) => metrics.record_confirmed(kind),
        Err(_) => metrics.record_failed(kind),
    }
}

fn record_blocked(metrics: &Metrics, action: &'static str, error: &FormError) {
    warn!(action, reason = error.reason(), "{}", error);
    metrics.record_blocked(action, error.reason());
}
