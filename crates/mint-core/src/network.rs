//! Network guarantor.
//!
//! Makes sure the wallet is on the target chain before accounts are
//! requested. A wallet that does not know the chain is asked to add it from
//! the configured descriptor; every other switch failure aborts the connect.

use crate::NetworkError;
use mint_types::TargetNetwork;
use mint_wallet::{WalletError, WalletInterface};
use std::sync::Arc;
use tracing::instrument;

pub struct NetworkGuarantor {
	wallet: Arc<dyn WalletInterface>,
	network: TargetNetwork,
}

impl NetworkGuarantor {
	pub fn new(wallet: Arc<dyn WalletInterface>, network: TargetNetwork) -> Self {
		Self { wallet, network }
	}

	pub fn network(&self) -> &TargetNetwork {
		&self.network
	}

	/// Switches the wallet to the target chain, adding the chain if the wallet does not know it.
	#[instrument(skip_all, fields(target = self.network.chain_id))]
	pub async fn ensure_target_network(&self) -> Result<(), NetworkError> {
		let target = self.network.chain_id;
		let current = self.wallet.chain_id().await.map_err(NetworkError::ChainId)?;
		if current == target {
			tracing::debug!(chain_id = current, "Wallet already on target network");
			return Ok(());
		}

		tracing::info!(
			current = current,
			target = target,
			hex = %self.network.chain_id_hex(),
			"Requesting network switch"
		);

		match self.wallet.switch_chain(target).await {
			Ok(()) => Ok(()),
			Err(WalletError::UnrecognizedChain(_)) => self.add_target_network().await,
			Err(source) => Err(NetworkError::Switch {
				chain_id: target,
				source,
			}),
		}
	}

	async fn add_target_network(&self) -> Result<(), NetworkError> {
		let target = self.network.chain_id;
		tracing::info!(
			chain_id = target,
			name = %self.network.name,
			rpc_urls = ?self.network.rpc_urls,
			"Wallet does not know the network, requesting add"
		);

		self.wallet
			.add_chain(&self.network)
			.await
			.map_err(|source| NetworkError::Add {
				chain_id: target,
				source,
			})?;

		let actual = self.wallet.chain_id().await.map_err(NetworkError::ChainId)?;
		if actual != target {
			return Err(NetworkError::Mismatch {
				expected: target,
				actual,
			});
		}
		Ok(())
	}
}
