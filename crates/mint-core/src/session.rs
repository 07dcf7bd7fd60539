//! Wallet session.
//!
//! Owns the connected-account identity. `connect` runs the network check,
//! asks the wallet for accounts and loads the account's state; the account
//! listener follows account changes the wallet reports on its own for the
//! lifetime of the application.

use crate::network::NetworkGuarantor;
use crate::reader::ChainReader;
use crate::state::StateHandle;
use crate::SessionError;
use alloy_primitives::Address;
use mint_wallet::WalletInterface;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::instrument;

pub struct WalletSession {
	wallet: Arc<dyn WalletInterface>,
	guarantor: NetworkGuarantor,
	reader: Arc<ChainReader>,
	state: StateHandle,
}

impl WalletSession {
	pub fn new(
		wallet: Arc<dyn WalletInterface>,
		guarantor: NetworkGuarantor,
		reader: Arc<ChainReader>,
		state: StateHandle,
	) -> Self {
		Self {
			wallet,
			guarantor,
			reader,
			state,
		}
	}

	pub fn guarantor(&self) -> &NetworkGuarantor {
		&self.guarantor
	}

	/// Connects the wallet's selected account.
	///
	/// The wallet is moved to the target network before accounts are
	/// requested. On success the account's state has been refreshed by the
	/// time this returns. Failures are also written to the status line.
	#[instrument(skip_all)]
	pub async fn connect(&self) -> Result<Address, SessionError> {
		match self.try_connect().await {
			Ok(address) => Ok(address),
			Err(e) => {
				tracing::warn!(error = %e, "Wallet connection failed");
				self.state.set_status(e.status_message()).await;
				Err(e)
			},
		}
	}

	async fn try_connect(&self) -> Result<Address, SessionError> {
		self.guarantor.ensure_target_network().await?;

		let accounts = self.wallet.request_accounts().await?;
		let address = accounts.first().copied().ok_or(SessionError::NoWallet)?;

		self.state.set_account(Some(address)).await;
		tracing::info!(account = %address, "Wallet connected");

		self.reader.refresh().await;
		Ok(address)
	}

	/// Applies an account list reported by the wallet.
	///
	/// The first account becomes the connected one; an empty list clears it.
	/// Every notification is followed by a refresh, including one that
	/// repeats the current account.
	pub async fn handle_accounts_changed(&self, accounts: &[Address]) {
		let address = accounts.first().copied();
		if self.state.set_account(address).await {
			match address {
				Some(address) => tracing::info!(account = %address, "Wallet switched account"),
				None => tracing::info!("Wallet disconnected"),
			}
		} else {
			tracing::debug!("Account notification without change");
		}
		self.reader.refresh().await;
	}

	/// Follows the wallet's account-change notifications until the wallet
	/// closes the channel.
	pub fn spawn_account_listener(self: &Arc<Self>) -> JoinHandle<()> {
		let mut notifications = self.wallet.subscribe_accounts();
		let session = Arc::clone(self);

		tokio::spawn(async move {
			loop {
				match notifications.recv().await {
					Ok(accounts) => session.handle_accounts_changed(&accounts).await,
					Err(RecvError::Lagged(skipped)) => {
						tracing::warn!(skipped = skipped, "Missed account notifications");
					},
					Err(RecvError::Closed) => {
						tracing::debug!("Account notifications closed");
						break;
					},
				}
			}
		})
	}
}
