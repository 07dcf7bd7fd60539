//! Wallet and contract boundaries of the mint client.
//!
//! This module defines the two external systems the client talks to as
//! traits: the wallet provider (chain selection, accounts and account-change
//! notifications) and the collection contract (reads, dry runs, submission
//! and confirmation). Concrete implementations backed by Alloy live under
//! [`implementations`].

use alloy_primitives::{Address, TxHash, U256};
use alloy_transport::{RpcError, TransportError, TransportErrorKind};
use async_trait::async_trait;
use mint_types::TargetNetwork;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;

pub mod classify;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
		pub mod local_wallet;
	}
}

/// Errors reported by the wallet provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletError {
	/// No wallet is available to handle requests.
	#[error("No wallet provider found. Install a wallet or configure signer keys")]
	NotInstalled,
	/// The user declined the request.
	#[error("User rejected the request")]
	UserRejected,
	/// The wallet does not know the requested chain.
	#[error("Unrecognized chain ID {0}")]
	UnrecognizedChain(u64),
	/// The wallet returned no accounts.
	#[error("Wallet returned no accounts")]
	NoAccounts,
	/// Any other wallet RPC failure.
	#[error("Wallet request failed ({code}): {message}")]
	Rpc { code: i64, message: String },
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
}

impl WalletError {
	/// Classifies a raw wallet failure into the recognised conditions.
	pub fn from_rpc(code: i64, message: impl Into<String>, chain_id: Option<u64>) -> Self {
		let message = message.into();
		if classify::is_user_rejected(Some(code), &message) {
			WalletError::UserRejected
		} else if classify::is_unrecognized_chain(Some(code), &message) {
			WalletError::UnrecognizedChain(chain_id.unwrap_or_default())
		} else {
			WalletError::Rpc { code, message }
		}
	}

	/// EIP-1193 style error code.
	pub fn code(&self) -> i64 {
		match self {
			WalletError::NotInstalled => 4100,
			WalletError::UserRejected => classify::USER_REJECTED_CODE,
			WalletError::UnrecognizedChain(_) => classify::UNRECOGNIZED_CHAIN_CODE,
			WalletError::NoAccounts => 4100,
			WalletError::Rpc { code, .. } => *code,
			WalletError::Network(_) => -32603,
		}
	}
}

/// Errors reported by the collection contract or the RPC node behind it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContractError {
	/// The call reverted with a decoded reason.
	#[error("execution reverted: {0}")]
	Reverted(String),
	/// The node answered with a JSON-RPC (or HTTP) error.
	#[error("RPC error {code}: {message}")]
	Rpc { code: i64, message: String },
	/// The request never got a JSON-RPC answer.
	#[error("Transport error: {0}")]
	Transport(String),
	/// The answer could not be decoded.
	#[error("Failed to decode {method} response: {reason}")]
	Decode { method: String, reason: String },
	/// The transaction was mined but reverted.
	#[error("Transaction {0} reverted")]
	TxReverted(TxHash),
	/// Waiting for inclusion failed or timed out.
	#[error("Transaction {tx_hash} not confirmed: {reason}")]
	Confirmation { tx_hash: TxHash, reason: String },
	/// The wallet could not serve the request.
	#[error(transparent)]
	Wallet(#[from] WalletError),
}

impl ContractError {
	/// Short human-readable message, preferring the contract's own revert reason.
	pub fn short_message(&self) -> String {
		match self {
			ContractError::Reverted(reason) => reason.clone(),
			ContractError::Rpc { message, .. } => message.clone(),
			ContractError::Transport(message) => message.clone(),
			ContractError::Wallet(WalletError::Rpc { message, .. }) => message.clone(),
			other => other.to_string(),
		}
	}

	fn code(&self) -> Option<i64> {
		match self {
			ContractError::Rpc { code, .. } => Some(*code),
			ContractError::Wallet(err) => Some(err.code()),
			_ => None,
		}
	}

	/// Returns true when the node rejected the request because of throttling.
	pub fn is_rate_limited(&self) -> bool {
		match self {
			ContractError::Rpc { .. } | ContractError::Transport(_) | ContractError::Wallet(_) => {
				classify::is_rate_limited(self.code(), &self.short_message())
			},
			_ => false,
		}
	}

	/// Returns true when a dry run failed for a reason the tooling cannot
	/// simulate, rather than because the mint itself is invalid.
	pub fn is_benign_simulation_failure(&self) -> bool {
		match self {
			ContractError::Reverted(_) => false,
			_ => classify::is_benign_simulation_failure(&self.to_string()),
		}
	}

	/// Returns true when the user declined to sign.
	pub fn is_user_rejected(&self) -> bool {
		match self {
			ContractError::Wallet(WalletError::UserRejected) => true,
			ContractError::Rpc { code, message } => classify::is_user_rejected(Some(*code), message),
			_ => false,
		}
	}
}

impl From<TransportError> for ContractError {
	fn from(err: TransportError) -> Self {
		match &err {
			RpcError::ErrorResp(payload) => {
				if let Some(reason) = payload
					.as_revert_data()
					.and_then(|data| alloy_sol_types::decode_revert_reason(&data))
				{
					return ContractError::Reverted(reason);
				}
				ContractError::Rpc {
					code: payload.code,
					message: payload.message.to_string(),
				}
			},
			RpcError::Transport(TransportErrorKind::HttpError(http)) => ContractError::Rpc {
				code: http.status as i64,
				message: format!("HTTP error {}: {}", http.status, http.body),
			},
			_ => ContractError::Transport(err.to_string()),
		}
	}
}

/// Parameters of a mint transaction, shared by dry run, estimate and submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintCall {
	/// Account paying for and receiving the tokens.
	pub from: Address,
	/// Number of tokens to mint.
	pub quantity: u64,
	/// Value attached to the transaction in wei.
	pub value: U256,
	/// Gas limit from a prior estimate, if one succeeded.
	pub gas_limit: Option<u64>,
}

/// Result of waiting for a transaction's inclusion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedTx {
	pub tx_hash: TxHash,
	pub block_number: Option<u64>,
	pub success: bool,
}

/// Interface of the wallet provider.
///
/// Mirrors the requests a browser wallet answers (`eth_chainId`,
/// `eth_requestAccounts`, `wallet_switchEthereumChain`,
/// `wallet_addEthereumChain`) plus its `accountsChanged` notifications.
#[async_trait]
#[cfg_attr(feature = "testing", mockall::automock)]
pub trait WalletInterface: Send + Sync {
	/// Chain the wallet is currently connected to.
	async fn chain_id(&self) -> Result<u64, WalletError>;

	/// Asks the wallet for its accounts; the selected account comes first.
	async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

	/// Asks the wallet to switch to `chain_id`.
	///
	/// Fails with [`WalletError::UnrecognizedChain`] when the wallet does
	/// not know the chain yet.
	async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError>;

	/// Asks the wallet to register the network and switch to it.
	async fn add_chain(&self, network: &TargetNetwork) -> Result<(), WalletError>;

	/// Subscribes to account-change notifications.
	///
	/// Each notification carries the new account list, selected account
	/// first; an empty list means the wallet disconnected.
	fn subscribe_accounts(&self) -> broadcast::Receiver<Vec<Address>>;
}

/// Interface of the deployed collection contract.
///
/// Read methods return raw `U256` values; converting them into display
/// integers is the caller's concern.
#[async_trait]
#[cfg_attr(feature = "testing", mockall::automock)]
pub trait MintContractInterface: Send + Sync {
	/// Number of tokens minted so far.
	async fn total_supply(&self) -> Result<U256, ContractError>;

	/// Collection cap.
	async fn max_supply(&self) -> Result<U256, ContractError>;

	/// Price of one token in wei.
	async fn mint_price(&self) -> Result<U256, ContractError>;

	/// Per-wallet mint cap.
	async fn max_per_wallet(&self) -> Result<U256, ContractError>;

	/// Tokens `account` has minted; not every deployment exposes this.
	async fn minted_count(&self, account: Address) -> Result<U256, ContractError>;

	/// Tokens `account` currently holds.
	async fn balance_of(&self, account: Address) -> Result<U256, ContractError>;

	/// Dry-runs the mint without broadcasting it.
	async fn simulate_mint(&self, call: MintCall) -> Result<(), ContractError>;

	/// Estimates gas for the mint.
	async fn estimate_mint_gas(&self, call: MintCall) -> Result<u64, ContractError>;

	/// Signs and broadcasts the mint, returning its hash.
	async fn send_mint(&self, call: MintCall) -> Result<TxHash, ContractError>;

	/// Waits until the transaction has `confirmations` confirmations or `timeout` elapses.
	async fn wait_for_receipt(
		&self,
		tx_hash: TxHash,
		confirmations: u64,
		timeout: Duration,
	) -> Result<ConfirmedTx, ContractError>;
}
