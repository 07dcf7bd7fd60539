//! Command-line front end for the mint client.
//!
//! Connects a local signer wallet to the configured network, renders the
//! mint panel and drives mints through the core orchestrator.

mod cli;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use mint_config::Config;
use mint_core::{DisplaySettings, MintApp};
use mint_types::{Address, MintEvent, MintPhase, MintRequest};
use mint_wallet::implementations::evm::{alloy::AlloyMintContract, local_wallet::LocalWallet};
use mint_wallet::MintContractInterface;
use output::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How long to wait for queued phase lines after a mint returns.
const PRINTER_DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	init_logging(cli.debug);

	if let Err(e) = run(cli).await {
		Display::error(&format!("{:#}", e));
		std::process::exit(1);
	}
}

fn init_logging(debug: bool) {
	let default_filter = if debug {
		"mint_demo=debug,mint_core=debug,mint_wallet=debug,mint_config=debug,warn"
	} else {
		"mint_demo=info,mint_core=info,warn"
	};
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

	tracing_subscriber::registry()
		.with(
			fmt::layer()
				.with_target(true)
				.with_thread_ids(false)
				.with_file(false)
				.with_line_number(false)
				.compact(),
		)
		.with(env_filter)
		.init();
}

async fn load_config(cli: &Cli) -> Result<Config> {
	match &cli.config {
		Some(path) => Config::from_file(path)
			.await
			.with_context(|| format!("Failed to load config from {}", path.display())),
		None => Config::from_env().context("Failed to build config from environment"),
	}
}

async fn build_app(config: &Config, account: Option<usize>) -> Result<MintApp> {
	let rpc_url = config
		.wallet_rpc_url()
		.context("No RPC URL configured for the wallet")?;
	let wallet = Arc::new(
		LocalWallet::connect(&config.wallet.private_keys, rpc_url)
			.await
			.context("Failed to start local wallet")?,
	);

	if let Some(index) = account {
		wallet
			.select_account(index)
			.await
			.with_context(|| format!("No signer key at index {}", index))?;
	}

	let contract = config.contract.address.map(|address| {
		Arc::new(AlloyMintContract::new(wallet.clone(), address)) as Arc<dyn MintContractInterface>
	});

	tracing::debug!(
		chain_id = config.network.chain_id,
		contract = ?config.contract.address,
		accounts = wallet.account_count(),
		"Building mint client"
	);
	Ok(MintApp::new(config, wallet, contract))
}

async fn run(cli: Cli) -> Result<()> {
	let config = load_config(&cli).await?;

	if let Commands::Network = cli.command {
		Display::network(&config.network, &DisplaySettings::from(&config));
		return Ok(());
	}

	let app = build_app(&config, cli.account).await?;
	let listener = app.spawn_account_listener();

	match cli.command {
		Commands::Status => {
			connect(&app).await;
			app.refresh().await;
			Display::view(&app.view(&MintRequest::default()).await);
		},
		Commands::Connect => {
			if let Some(address) = connect(&app).await {
				Display::success(&format!("Connected {}", address));
			}
		},
		Commands::Mint { quantity } => mint(&app, quantity).await?,
		Commands::Network => {},
	}

	listener.abort();
	Ok(())
}

/// Connects the wallet, reporting failures without aborting.
async fn connect(app: &MintApp) -> Option<Address> {
	match app.connect().await {
		Ok(address) => Some(address),
		Err(e) => {
			Display::warning(&e.status_message());
			None
		},
	}
}

async fn mint(app: &MintApp, quantity: u64) -> Result<()> {
	connect(app)
		.await
		.context("A connected wallet is required to mint")?;

	let mut request = MintRequest::new(quantity);
	let view = app.view(&request).await;
	if view.max_quantity > 0 && quantity > view.max_quantity {
		Display::warning(&format!(
			"Quantity {} exceeds the limit of {}, minting {}",
			quantity, view.max_quantity, view.max_quantity
		));
		request.clamp(view.max_quantity);
	}

	let view = app.view(&request).await;
	Display::section(&format!("Minting {} for {}", request.quantity, view.total_price));

	let mut events = app.subscribe();
	let printer = tokio::spawn(async move { follow_phases(&mut events, Display::phase).await });

	let result = app.mint(&request).await;
	if tokio::time::timeout(PRINTER_DRAIN_TIMEOUT, printer).await.is_err() {
		tracing::debug!("Phase printer did not see a terminal phase");
	}

	match result {
		Ok(receipt) => {
			Display::receipt(&receipt, app.display());
			Display::view(&app.view(&MintRequest::default()).await);
			Ok(())
		},
		Err(e) if e.is_client_side() => Err(anyhow::anyhow!(e.status_message())),
		Err(e) => Err(anyhow::Error::new(e).context("Mint failed")),
	}
}

/// Hands every published phase to `on_phase` until a terminal one or the
/// bus closes.
async fn follow_phases(
	events: &mut broadcast::Receiver<MintEvent>,
	mut on_phase: impl FnMut(&MintPhase),
) {
	loop {
		match events.recv().await {
			Ok(MintEvent::PhaseChanged(phase)) => {
				on_phase(&phase);
				if phase.is_terminal() {
					break;
				}
			},
			Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {},
			Err(broadcast::error::RecvError::Closed) => break,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_follow_phases_delivers_queued_phases_through_terminal() {
		let (tx, mut rx) = broadcast::channel(16);
		tx.send(MintEvent::PhaseChanged(MintPhase::Validating)).unwrap();
		tx.send(MintEvent::StatusChanged("sending".into())).unwrap();
		tx.send(MintEvent::PhaseChanged(MintPhase::Submitting { attempt: 0 }))
			.unwrap();
		tx.send(MintEvent::PhaseChanged(MintPhase::Failed {
			reason: "Sold out".into(),
		}))
		.unwrap();
		tx.send(MintEvent::PhaseChanged(MintPhase::Idle)).unwrap();

		let mut seen = Vec::new();
		follow_phases(&mut rx, |phase| seen.push(phase.clone())).await;

		assert_eq!(
			seen,
			vec![
				MintPhase::Validating,
				MintPhase::Submitting { attempt: 0 },
				MintPhase::Failed {
					reason: "Sold out".into()
				},
			]
		);
		assert_eq!(
			rx.try_recv().unwrap(),
			MintEvent::PhaseChanged(MintPhase::Idle)
		);
	}

	#[tokio::test]
	async fn test_follow_phases_stops_when_bus_closes() {
		let (tx, mut rx) = broadcast::channel::<MintEvent>(4);
		tx.send(MintEvent::PhaseChanged(MintPhase::Simulating)).unwrap();
		drop(tx);

		let mut count = 0;
		follow_phases(&mut rx, |_| count += 1).await;
		assert_eq!(count, 1);
	}
}
