//! Mint orchestration core.
//!
//! This crate wires the chain reader, network guarantor, wallet session,
//! mint orchestrator and view projector around one shared application state
//! and one event bus. Every component talks to the outside world only
//! through the boundary traits of `mint-wallet`, so the whole flow can be
//! driven by mocks in tests.

use alloy_primitives::TxHash;
use mint_wallet::WalletError;
use thiserror::Error;

pub mod app;
pub mod engine;
pub mod network;
pub mod orchestrator;
pub mod projector;
pub mod reader;
pub mod session;
pub mod state;

#[cfg(test)]
mod test_support;

pub use app::MintApp;
pub use engine::event_bus::EventBus;
pub use network::NetworkGuarantor;
pub use orchestrator::{MintOrchestrator, MintSettings};
pub use projector::{DisplaySettings, MintBlockedReason, ViewState};
pub use reader::{ChainReader, RefreshOutcome};
pub use session::WalletSession;
pub use state::{AppState, StateHandle};

/// Errors raised while converting contract reads into display state.
///
/// Never surfaced to the user; the reader logs them and keeps prior state.
#[derive(Debug, Error)]
pub enum ReadError {
	#[error("No contract configured")]
	NotConfigured,
	#[error("Read of {method} failed: {reason}")]
	Contract { method: &'static str, reason: String },
	#[error("{method} returned {value}, which does not fit a display integer")]
	Overflow { method: &'static str, value: String },
}

/// Errors raised while making sure the wallet is on the target network.
#[derive(Debug, Error)]
pub enum NetworkError {
	#[error("Failed to read wallet chain: {0}")]
	ChainId(WalletError),
	#[error("Failed to switch to chain {chain_id}: {source}")]
	Switch { chain_id: u64, source: WalletError },
	#[error("Failed to add chain {chain_id}: {source}")]
	Add { chain_id: u64, source: WalletError },
	#[error("Wallet is on chain {actual}, expected {expected}")]
	Mismatch { expected: u64, actual: u64 },
}

/// Errors raised by the connect flow.
#[derive(Debug, Error)]
pub enum SessionError {
	#[error("No wallet found. Install a wallet or configure signer keys")]
	NoWallet,
	#[error("Connection request rejected")]
	UserRejected,
	#[error(transparent)]
	Network(#[from] NetworkError),
	#[error("Wallet error: {0}")]
	Wallet(WalletError),
}

impl From<WalletError> for SessionError {
	fn from(err: WalletError) -> Self {
		match err {
			WalletError::NotInstalled | WalletError::NoAccounts => SessionError::NoWallet,
			WalletError::UserRejected => SessionError::UserRejected,
			other => SessionError::Wallet(other),
		}
	}
}

impl SessionError {
	/// Message for the status line.
	pub fn status_message(&self) -> String {
		match self {
			SessionError::Network(NetworkError::Switch { source, .. })
			| SessionError::Network(NetworkError::Add { source, .. }) => {
				format!("Network switch failed: {}", source)
			},
			other => other.to_string(),
		}
	}
}

/// Reasons a mint ends in the `Failed` phase.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MintError {
	#[error("Contract address is not configured")]
	NotConfigured,
	#[error("Connect a wallet first")]
	NoWallet,
	#[error("Collection state has not been loaded yet")]
	SnapshotUnavailable,
	#[error("Invalid quantity {requested}: must be between 1 and {max}")]
	InvalidQuantity { requested: u64, max: u64 },
	#[error("Wallet has reached its mint allowance")]
	AllowanceExhausted,
	#[error("Collection is sold out")]
	SupplyExhausted,
	#[error("A mint is already in progress")]
	MintInProgress,
	#[error("Total price overflows")]
	PriceOverflow,
	#[error("Simulation failed: {0}")]
	SimulationFailed(String),
	#[error("RPC rate limited after {attempts} attempts: {message}")]
	RateLimited { attempts: u32, message: String },
	#[error("Transaction rejected in wallet")]
	UserRejected,
	#[error("Submission failed: {0}")]
	SubmissionFailed(String),
	#[error("Transaction {0} reverted")]
	Reverted(TxHash),
	#[error("Confirmation failed: {0}")]
	ConfirmationFailed(String),
}

impl MintError {
	/// Message for the status line, preferring the contract's or node's own
	/// short message over the generic wrapper text.
	pub fn status_message(&self) -> String {
		match self {
			MintError::SimulationFailed(message)
			| MintError::SubmissionFailed(message)
			| MintError::ConfirmationFailed(message) => message.clone(),
			MintError::RateLimited { .. } => {
				"The RPC is rate limiting requests. Please try again in a moment".to_string()
			},
			other => other.to_string(),
		}
	}

	/// Returns true for failures caught before any network call.
	pub fn is_client_side(&self) -> bool {
		matches!(
			self,
			MintError::NotConfigured
				| MintError::NoWallet
				| MintError::SnapshotUnavailable
				| MintError::InvalidQuantity { .. }
				| MintError::AllowanceExhausted
				| MintError::SupplyExhausted
				| MintError::MintInProgress
				| MintError::PriceOverflow
		)
	}
}
