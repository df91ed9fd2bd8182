//! Terminal front end for the donation dApp
//!
//! Connects through a wallet bridge, resolves the donation contract and
//! prints the rendered page.
//!
//! Usage examples:
//! ```shell
//! # Show connection, network consistency and contract details
//! donation-cli status
//!
//! # Donate 250 μCCD on mainnet
//! donation-cli --network mainnet donate 250
//!
//! # Read the donation state
//! donation-cli view
//! ```

use clap::{Parser, Subcommand};
use concordium_client::{Config, ConnectorType, HttpWalletBridgeFactory, NetworkConfig};
use donation_app::{Action, ConnectionPhase, ContractSelection, DonationApp};
use eyre::{bail, Result, WrapErr};
use std::{env, sync::Arc, time::Duration};
use tracing::{info, warn};
use url::Url;

#[derive(Parser)]
#[command(name = "donation-cli")]
#[command(about = "Donate to a Concordium smart contract through a wallet bridge")]
#[command(version)]
struct Cli {
    /// Network to use, testnet or mainnet [env: DONATION_NETWORK]
    #[arg(long)]
    network: Option<String>,

    /// Overrides the network's JSON-RPC endpoint [env: DONATION_JSON_RPC_URL]
    #[arg(long)]
    json_rpc_url: Option<Url>,

    /// Index of the donation contract instance [env: DONATION_CONTRACT_INDEX]
    #[arg(long)]
    contract_index: Option<String>,

    /// Wallet bridge base URL [env: DONATION_WALLET_BRIDGE_URL]
    #[arg(long)]
    wallet_bridge_url: Option<Url>,

    /// Connector to activate, browser or walletconnect [env: DONATION_CONNECTOR]
    #[arg(long)]
    connector: Option<ConnectorType>,

    /// Timeout for node and bridge requests, in seconds [env: DONATION_RPC_TIMEOUT_SECONDS]
    #[arg(long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect and print the page
    Status,
    /// Donate an amount in μCCD
    Donate {
        /// Amount in μCCD
        amount: String,
    },
    /// Close the donation (contract owner only)
    Close,
    /// Read the donation state and balance
    View,
}

impl Cli {
    /// Environment configuration with command-line flags applied on top.
    fn config(&self) -> Result<Config> {
        let mut config = Config::from_env()?;
        if let Some(name) = &self.network {
            config.network = NetworkConfig::by_name(name)?;
        }
        if let Some(url) = &self.json_rpc_url {
            config.network.json_rpc_url = url.clone();
        }
        if let Some(index) = &self.contract_index {
            config.contract_index = index.clone();
        }
        if let Some(url) = &self.wallet_bridge_url {
            config.wallet_bridge_url = url.clone();
        }
        if let Some(connector) = self.connector {
            config.connector = connector;
        }
        if let Some(timeout) = self.timeout {
            config.rpc_timeout_seconds = timeout;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(env::var("RUST_LOG").unwrap_or_else(|_| "donation_cli=info".to_string()))
        .init();

    let cli = Cli::parse();
    let config = cli.config().wrap_err("invalid configuration")?;

    info!(
        network = %config.network.name,
        contract = %config.contract_index,
        bridge = %config.wallet_bridge_url,
        "Starting donation client"
    );

    let factory = HttpWalletBridgeFactory::new(
        config.wallet_bridge_url.clone(),
        Duration::from_secs(config.rpc_timeout_seconds),
    )?;
    let mut app = DonationApp::from_config(Arc::new(factory), &config);

    app.activate_connector(config.connector).await;
    if let ConnectionPhase::ConnectorFailed(error) = app.phase() {
        println!("{}", app.render());
        bail!("connector failed to attach: {error}");
    }

    app.connect().await;
    app.settle().await;

    if let ContractSelection::Failed(error) = app.contract() {
        warn!("Contract lookup failed, retrying once: {error}");
        app.dispatch(Action::ReselectContract, "").await;
        app.settle().await;
    }

    match cli.command {
        Commands::Status => {}
        Commands::Donate { amount } => submit(&mut app, Action::Donate, &amount).await?,
        Commands::Close => submit(&mut app, Action::CloseDonation, "").await?,
        Commands::View => submit(&mut app, Action::RefreshView, "").await?,
    }

    println!("{}", app.render());
    app.deactivate_connector().await;

    Ok(())
}

/// Runs one invocation to completion and turns its error into a failure exit.
async fn submit(app: &mut DonationApp, action: Action, amount: &str) -> Result<()> {
    if !matches!(app.phase(), ConnectionPhase::Ready(_)) {
        println!("{}", app.render());
        bail!("no account connected");
    }

    let started = app.dispatch(action, amount).await;
    app.settle().await;

    let state = app.invoker();
    if let Some(error) = state.error {
        println!("{}", app.render());
        bail!("{error}");
    }
    if !started {
        warn!("Invocation was not started");
    }
    if let Some(hash) = state.tx_hash {
        info!(%hash, "Transaction submitted");
    }
    Ok(())
}
