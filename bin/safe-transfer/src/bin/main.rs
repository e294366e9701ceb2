//! Coordinate an ERC20 transfer through an allowance instead of a direct transfer.
//!
//! - `approve` / `revoke`: sender grants (or clears) the receiver's allowance
//! - `allowance` / `watch`: inspect the allowance from either side
//! - `pull`: receiver moves the allowed amount with `transferFrom`
//! - `decimals`: detect a token's precision

use alloy_primitives::Address;
use clap::{Parser, Subcommand};
use safe_transfer::{
    config::Config,
    metrics::{install_prometheus_exporter, Metrics},
    refresh_allowance, run_receiver, run_sender, watch_allowance, ReceiverInput, SenderInput,
};
use std::time::Duration;
use token::{detect_decimals, format_units, parse_address, AllowanceQuery, Erc20Token};
use tracing::info;
use view::{ReceiverView, SenderView};

#[derive(Parser)]
#[command(name = "safe-transfer")]
#[command(about = "Allowance-based ERC20 transfers: the sender approves, the receiver pulls")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Private key of the connected account (hex string, with or without 0x prefix)
    #[arg(short = 'k', long, env = "PRIVATE_KEY")]
    private_key: Option<String>,

    /// Dry-run mode: validate and log the call without submitting it
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect a token's decimals
    Decimals {
        #[arg(long)]
        token: String,
    },

    /// Read the allowance `owner` granted to `spender` (default: connected account)
    Allowance {
        #[arg(long)]
        token: String,
        #[arg(long)]
        owner: String,
        #[arg(long)]
        spender: Option<String>,
    },

    /// Poll an allowance and log every change
    Watch {
        #[arg(long)]
        token: String,
        #[arg(long)]
        owner: String,
        #[arg(long)]
        spender: Option<String>,
        /// Seconds between reads, at least 1
        #[arg(long, default_value_t = 15, value_parser = clap::value_parser!(u64).range(1..))]
        interval_secs: u64,
    },

    /// Sender: allow `receiver` to pull `amount`
    Approve {
        #[arg(long)]
        token: String,
        #[arg(long)]
        receiver: String,
        #[arg(long)]
        amount: String,
        /// Skip detection and use these decimals
        #[arg(long)]
        decimals: Option<String>,
    },

    /// Sender: set the receiver's allowance back to zero
    Revoke {
        #[arg(long)]
        token: String,
        #[arg(long)]
        receiver: String,
    },

    /// Receiver: pull `amount` from `sender` into the connected account
    Pull {
        #[arg(long)]
        token: String,
        #[arg(long)]
        sender: String,
        #[arg(long)]
        amount: String,
        /// Skip detection and use these decimals
        #[arg(long)]
        decimals: Option<String>,
    },
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_file(&cli.config)?;

    // Override dry_run from CLI flag
    if cli.dry_run {
        config.dry_run = true;
    }

    let network = config.network_config();
    let settings = config.settings();

    info!("Loaded config:");
    info!("  Network: {:?}", config.network);
    info!("  Chain ID: {}", network.chain_id);
    info!("  RPC URL: {}", config.rpc_url);
    if config.dry_run {
        info!("  Mode: DRY-RUN (no transactions will be executed)");
    }

    if let Some(port) = config.metrics_port {
        install_prometheus_exporter(port)?;
        info!("  Metrics: http://0.0.0.0:{}/metrics", port);
    }
    let metrics = Metrics::new();

    let account = cli
        .private_key
        .as_deref()
        .map(client::wallet_address)
        .transpose()?;

    match cli.command {
        Command::Decimals { token } => {
            let token = parse_input("token", &token)?;
            let provider = client::create_provider(&config.rpc_url).await?;
            client::ensure_chain_id(&provider, network.chain_id).await?;
            let client = Erc20Token::new(provider);

            let outcome = detect_decimals(&client, token, &settings.detection).await;
            metrics.record_decimals_detection(&outcome);
            if outcome.is_fallback() {
                println!(
                    "Failed to detect decimals. Using default ({}).",
                    settings.detection.fallback
                );
            }
            println!("Decimals: {}", outcome.decimals(settings.detection.fallback));
        }
        Command::Allowance {
            token,
            owner,
            spender,
        } => {
            let query = allowance_query(&token, &owner, spender.as_deref(), account)?;
            let provider = client::create_provider(&config.rpc_url).await?;
            client::ensure_chain_id(&provider, network.chain_id).await?;
            let client = Erc20Token::new(provider);

            let mut view = ReceiverView::new(Some(query.spender), settings.detection.fallback);
            if let Some(request) = view.set_token_address(token) {
                let outcome =
                    safe_transfer::detect(&client, request, &settings.detection, &metrics).await;
                view.apply_decimals(request.id, &outcome);
            }
            view.set_sender_address(owner);
            refresh_allowance(&client, &mut view).await;

            let decimals = view.token_field().display_decimals();
            match view.allowance_state().value() {
                Some(amount) => println!(
                    "Allowance: {} tokens ({} base units)",
                    format_units(*amount, decimals),
                    amount
                ),
                None => eyre::bail!("Failed to check allowance"),
            }
        }
        Command::Watch {
            token,
            owner,
            spender,
            interval_secs,
        } => {
            let query = allowance_query(&token, &owner, spender.as_deref(), account)?;
            let provider = client::create_provider(&config.rpc_url).await?;
            client::ensure_chain_id(&provider, network.chain_id).await?;
            let client = Erc20Token::new(provider);

            let decimals = detect_decimals(&client, query.token, &settings.detection)
                .await
                .decimals(settings.detection.fallback);

            info!(interval_secs, "Watching allowance, Ctrl-C to stop");
            tokio::select! {
                _ = watch_allowance(
                    &client,
                    query,
                    decimals,
                    Duration::from_secs(interval_secs),
                    &metrics,
                    |allowance| println!("Allowance: {} tokens", format_units(allowance.amount, decimals)),
                ) => {}
                _ = tokio::signal::ctrl_c() => info!("Stopped"),
            }
        }
        Command::Approve {
            token,
            receiver,
            amount,
            decimals,
        } => {
            let input = SenderInput {
                token,
                receiver,
                amount,
                decimals,
            };
            run_sender_command(&cli.private_key, account, &config, input, &metrics).await?;
        }
        Command::Revoke { token, receiver } => {
            let input = SenderInput {
                token,
                receiver,
                amount: "0".to_string(),
                decimals: None,
            };
            run_sender_command(&cli.private_key, account, &config, input, &metrics).await?;
        }
        Command::Pull {
            token,
            sender,
            amount,
            decimals,
        } => {
            let private_key = require_key(&cli.private_key)?;
            let provider = client::create_wallet_provider(&config.rpc_url, private_key)?;
            client::ensure_chain_id(&provider, network.chain_id).await?;
            let client = Erc20Token::new(provider);

            let mut view = ReceiverView::new(account, settings.detection.fallback);
            let input = ReceiverInput {
                token,
                sender,
                amount,
                decimals,
            };
            let result = run_receiver(&client, &mut view, input, &settings, &metrics).await;

            print_panel(&view.render());
            result?;
            report_tx(view.tx_status(), &network)?;
        }
    }

    Ok(())
}

async fn run_sender_command(
    private_key: &Option<String>,
    account: Option<Address>,
    config: &Config,
    input: SenderInput,
    metrics: &Metrics,
) -> eyre::Result<()> {
    let network = config.network_config();
    let settings = config.settings();

    let private_key = require_key(private_key)?;
    let provider = client::create_wallet_provider(&config.rpc_url, private_key)?;
    client::ensure_chain_id(&provider, network.chain_id).await?;
    let client = Erc20Token::new(provider);

    let mut view = SenderView::new(account, settings.detection.fallback);
    let result = run_sender(&client, &mut view, input, &settings, metrics).await;

    print_panel(&view.render());
    result?;
    report_tx(view.tx_status(), &network)
}

fn require_key(private_key: &Option<String>) -> eyre::Result<&str> {
    private_key
        .as_deref()
        .ok_or_else(|| eyre::eyre!("A private key is required: pass --private-key or set PRIVATE_KEY"))
}

fn parse_input(field: &str, value: &str) -> eyre::Result<Address> {
    parse_address(value).map_err(|e| eyre::eyre!("Invalid {} address: {}", field, e))
}

fn allowance_query(
    token: &str,
    owner: &str,
    spender: Option<&str>,
    account: Option<Address>,
) -> eyre::Result<AllowanceQuery> {
    let spender = match spender {
        Some(spender) => parse_input("spender", spender)?,
        None => account.ok_or_else(|| {
            eyre::eyre!("Pass --spender or a private key for the connected account")
        })?,
    };

    Ok(AllowanceQuery {
        token: parse_input("token", token)?,
        owner: parse_input("owner", owner)?,
        spender,
    })
}

fn print_panel(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

fn report_tx(status: &action::TxStatus, network: &config::NetworkConfig) -> eyre::Result<()> {
    match status {
        action::TxStatus::Confirmed(hash) => {
            info!(explorer = %network.tx_url(*hash), "Done");
            Ok(())
        }
        action::TxStatus::Failed(reason) => eyre::bail!("Transaction failed: {}", reason),
        _ => Ok(()),
    }
}
