//! Application wiring.
//!
//! [`MintApp`] builds every core component around one state handle from a
//! configuration and the two boundary implementations, and exposes the
//! user intents a front end forwards.

use crate::engine::event_bus::EventBus;
use crate::network::NetworkGuarantor;
use crate::orchestrator::{MintOrchestrator, MintSettings};
use crate::projector::{DisplaySettings, ViewState};
use crate::reader::{ChainReader, RefreshOutcome};
use crate::session::WalletSession;
use crate::state::StateHandle;
use crate::{MintError, SessionError};
use alloy_primitives::Address;
use mint_config::Config;
use mint_types::{MintEvent, MintReceipt, MintRequest};
use mint_wallet::{MintContractInterface, WalletInterface};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Events buffered per subscriber before the oldest are dropped.
const EVENT_CAPACITY: usize = 256;

pub struct MintApp {
	state: StateHandle,
	reader: Arc<ChainReader>,
	session: Arc<WalletSession>,
	orchestrator: Arc<MintOrchestrator>,
	display: DisplaySettings,
}

impl MintApp {
	/// Wires the components.
	///
	/// `contract` is `None` when no contract address is configured; reads
	/// are then skipped and mints fail with [`MintError::NotConfigured`].
	pub fn new(
		config: &Config,
		wallet: Arc<dyn WalletInterface>,
		contract: Option<Arc<dyn MintContractInterface>>,
	) -> Self {
		let state = StateHandle::new(EventBus::new(EVENT_CAPACITY));
		let reader = Arc::new(ChainReader::new(contract.clone(), state.clone()));
		let guarantor = NetworkGuarantor::new(wallet.clone(), config.network.clone());
		let session = Arc::new(WalletSession::new(
			wallet,
			guarantor,
			reader.clone(),
			state.clone(),
		));
		let orchestrator = Arc::new(MintOrchestrator::new(
			contract,
			reader.clone(),
			state.clone(),
			MintSettings::from(config),
		));
		let display = DisplaySettings::from(config);

		if let Some(error) = &display.config_error {
			tracing::warn!(error = %error, "Client is not configured for minting");
		}

		Self {
			state,
			reader,
			session,
			orchestrator,
			display,
		}
	}

	pub fn state(&self) -> &StateHandle {
		&self.state
	}

	pub fn display(&self) -> &DisplaySettings {
		&self.display
	}

	pub fn session(&self) -> &Arc<WalletSession> {
		&self.session
	}

	pub fn subscribe(&self) -> broadcast::Receiver<MintEvent> {
		self.state.events().subscribe()
	}

	pub async fn connect(&self) -> Result<Address, SessionError> {
		self.session.connect().await
	}

	pub async fn refresh(&self) -> RefreshOutcome {
		self.reader.refresh().await
	}

	pub async fn mint(&self, request: &MintRequest) -> Result<MintReceipt, MintError> {
		self.orchestrator.mint(request.quantity).await
	}

	/// Starts following the wallet's account changes.
	pub fn spawn_account_listener(&self) -> JoinHandle<()> {
		self.session.spawn_account_listener()
	}

	/// Projects the current state for rendering.
	pub async fn view(&self, request: &MintRequest) -> ViewState {
		let state = self.state.read().await;
		ViewState::project(&state, request, &self.display)
	}
}
