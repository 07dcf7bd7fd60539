//! Local signing wallet backed by Alloy providers.
//!
//! Plays the role a browser wallet extension plays for a web front end: it
//! holds the signer keys, knows a set of chains, keeps one of them active and
//! notifies subscribers when the selected account changes. Switching to a
//! chain it has not been told about fails with the unrecognized-chain
//! condition, exactly like a browser wallet, until the chain is added.

use crate::{WalletError, WalletInterface};
use alloy_network::EthereumWallet;
use alloy_primitives::Address;
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use alloy_transport::{RpcError, TransportError};
use async_trait::async_trait;
use mint_types::{SecretString, TargetNetwork};
use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};

/// Capacity of the account-change notification channel.
const ACCOUNT_CHANNEL_CAPACITY: usize = 16;

/// Alloy-based local wallet.
///
/// Every provider it creates carries all configured signers, so the `from`
/// field of a transaction selects which key signs it.
pub struct LocalWallet {
	/// Signer addresses in configuration order.
	accounts: Vec<Address>,
	/// Wallet holding all signers, shared by every provider.
	signer: Option<EthereumWallet>,
	/// Providers for every chain the wallet knows.
	chains: RwLock<HashMap<u64, DynProvider>>,
	/// Chain currently selected.
	active_chain: RwLock<Option<u64>>,
	/// Index of the selected account.
	selected: RwLock<usize>,
	/// Account-change notifications.
	accounts_tx: broadcast::Sender<Vec<Address>>,
}

impl LocalWallet {
	/// Creates a wallet from private keys without connecting to any chain.
	///
	/// An empty key list produces a wallet that answers every account
	/// request with [`WalletError::NotInstalled`].
	pub fn new(private_keys: &[SecretString]) -> Result<Self, WalletError> {
		let signers = private_keys
			.iter()
			.enumerate()
			.map(|(index, key)| {
				key.with_exposed(|raw| {
					raw.parse::<PrivateKeySigner>().map_err(|_| WalletError::Rpc {
						code: -32602,
						message: format!("Invalid private key format at index {}", index),
					})
				})
			})
			.collect::<Result<Vec<_>, _>>()?;

		let accounts = signers.iter().map(|signer| signer.address()).collect();
		let signer = signers.into_iter().fold(None, |wallet, signer| match wallet {
			None => Some(EthereumWallet::from(signer)),
			Some(mut wallet) => {
				wallet.register_signer(signer);
				Some(wallet)
			},
		});

		let (accounts_tx, _) = broadcast::channel(ACCOUNT_CHANNEL_CAPACITY);

		Ok(Self {
			accounts,
			signer,
			chains: RwLock::new(HashMap::new()),
			active_chain: RwLock::new(None),
			selected: RwLock::new(0),
			accounts_tx,
		})
	}

	/// Creates a wallet and connects it to the chain served by `rpc_url`.
	pub async fn connect(private_keys: &[SecretString], rpc_url: &str) -> Result<Self, WalletError> {
		let wallet = Self::new(private_keys)?;
		let (chain_id, provider) = wallet.build_provider(rpc_url).await?;

		wallet.chains.write().await.insert(chain_id, provider);
		*wallet.active_chain.write().await = Some(chain_id);

		tracing::info!(chain_id = chain_id, rpc_url = rpc_url, "Local wallet connected");
		Ok(wallet)
	}

	/// Creates a provider for `rpc_url` and returns it with the chain id it reports.
	async fn build_provider(&self, rpc_url: &str) -> Result<(u64, DynProvider), WalletError> {
		let url = rpc_url
			.parse()
			.map_err(|e| WalletError::Network(format!("Invalid RPC URL {}: {}", rpc_url, e)))?;

		let provider = match &self.signer {
			Some(signer) => ProviderBuilder::new()
				.wallet(signer.clone())
				.connect_http(url)
				.erased(),
			None => ProviderBuilder::new().connect_http(url).erased(),
		};

		let chain_id = provider
			.get_chain_id()
			.await
			.map_err(|e| request_error(e, rpc_url))?;

		Ok((chain_id, provider))
	}

	/// Provider of the active chain.
	pub async fn active_provider(&self) -> Result<DynProvider, WalletError> {
		let active = (*self.active_chain.read().await).ok_or(WalletError::NotInstalled)?;
		self.chains
			.read()
			.await
			.get(&active)
			.cloned()
			.ok_or(WalletError::UnrecognizedChain(active))
	}

	/// Accounts with the selected one first.
	async fn ordered_accounts(&self) -> Vec<Address> {
		let selected = *self.selected.read().await;
		let mut ordered = self.accounts.clone();
		if selected < ordered.len() {
			let account = ordered.remove(selected);
			ordered.insert(0, account);
		}
		ordered
	}

	/// Selects another account and notifies subscribers.
	pub async fn select_account(&self, index: usize) -> Result<Address, WalletError> {
		let address = *self.accounts.get(index).ok_or(WalletError::NoAccounts)?;
		*self.selected.write().await = index;

		let ordered = self.ordered_accounts().await;
		tracing::debug!(account = %address, "Selected wallet account");
		let _ = self.accounts_tx.send(ordered);
		Ok(address)
	}

	/// Notifies subscribers that no account is connected any more.
	pub fn disconnect(&self) {
		tracing::debug!("Wallet disconnected all accounts");
		let _ = self.accounts_tx.send(Vec::new());
	}

	/// Number of signer accounts.
	pub fn account_count(&self) -> usize {
		self.accounts.len()
	}
}

/// Classifies a failed RPC request; error answers from the node keep their code.
fn request_error(err: TransportError, rpc_url: &str) -> WalletError {
	match err {
		RpcError::ErrorResp(payload) => {
			WalletError::from_rpc(payload.code, payload.message.to_string(), None)
		},
		other => WalletError::Network(format!("Failed to connect to {}: {}", rpc_url, other)),
	}
}

#[async_trait]
impl WalletInterface for LocalWallet {
	async fn chain_id(&self) -> Result<u64, WalletError> {
		(*self.active_chain.read().await).ok_or(WalletError::NotInstalled)
	}

	async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
		if self.accounts.is_empty() {
			return Err(WalletError::NotInstalled);
		}
		Ok(self.ordered_accounts().await)
	}

	async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
		if !self.chains.read().await.contains_key(&chain_id) {
			return Err(WalletError::UnrecognizedChain(chain_id));
		}
		*self.active_chain.write().await = Some(chain_id);
		tracing::info!(chain_id = chain_id, "Wallet switched chain");
		Ok(())
	}

	async fn add_chain(&self, network: &TargetNetwork) -> Result<(), WalletError> {
		if network.rpc_urls.is_empty() {
			return Err(WalletError::Rpc {
				code: -32602,
				message: format!("No RPC URL provided for chain {}", network.chain_id),
			});
		}

		let mut last_error = None;
		for rpc_url in &network.rpc_urls {
			match self.build_provider(rpc_url).await {
				Ok((reported, provider)) if reported == network.chain_id => {
					self.chains.write().await.insert(network.chain_id, provider);
					*self.active_chain.write().await = Some(network.chain_id);
					tracing::info!(
						chain_id = network.chain_id,
						name = %network.name,
						rpc_url = %rpc_url,
						"Wallet added chain"
					);
					return Ok(());
				},
				Ok((reported, _)) => {
					tracing::warn!(
						expected = network.chain_id,
						reported = reported,
						rpc_url = %rpc_url,
						"RPC endpoint reports a different chain id"
					);
					last_error = Some(WalletError::Rpc {
						code: -32602,
						message: format!(
							"RPC endpoint {} returned chain ID {}, expected {}",
							rpc_url, reported, network.chain_id
						),
					});
				},
				Err(e) => {
					tracing::warn!(rpc_url = %rpc_url, error = %e, "RPC endpoint unreachable");
					last_error = Some(e);
				},
			}
		}

		Err(last_error.unwrap_or(WalletError::Network(format!(
			"Could not add chain {}",
			network.chain_id
		))))
	}

	fn subscribe_accounts(&self) -> broadcast::Receiver<Vec<Address>> {
		self.accounts_tx.subscribe()
	}
}
