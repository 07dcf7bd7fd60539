//! Mint request, lifecycle phases and receipts.

use crate::{AccountState, ChainSnapshot};
use alloy_primitives::{TxHash, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The user's editable mint intent.
///
/// The quantity is kept within `1..=limit` while the user edits it, where the
/// limit comes from [`MintRequest::input_limit`]. When the limit is zero the
/// quantity stays at 1 and the mint control is disabled by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRequest {
	pub quantity: u64,
}

impl Default for MintRequest {
	fn default() -> Self {
		Self { quantity: 1 }
	}
}

impl MintRequest {
	pub fn new(quantity: u64) -> Self {
		Self { quantity }
	}

	/// Upper bound for the quantity input: `min(maxPerWallet, maxPerWallet - mintedCount)`.
	pub fn input_limit(snapshot: &ChainSnapshot, account: &AccountState) -> u64 {
		snapshot
			.max_per_wallet
			.min(account.remaining_allowance(snapshot.max_per_wallet))
	}

	/// Raises the quantity by one, never past `limit`.
	pub fn increment(&mut self, limit: u64) {
		if self.quantity < limit {
			self.quantity += 1;
		}
	}

	/// Lowers the quantity by one, never below one.
	pub fn decrement(&mut self) {
		if self.quantity > 1 {
			self.quantity -= 1;
		}
	}

	/// Forces the quantity back into `1..=limit` (or 1 when `limit` is 0).
	pub fn clamp(&mut self, limit: u64) {
		self.quantity = self.quantity.clamp(1, limit.max(1));
	}
}

/// Lifecycle of a single mint attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MintPhase {
	Idle,
	Validating,
	Simulating,
	/// Sending the transaction; `attempt` counts from zero.
	Submitting { attempt: u32 },
	Confirming { tx_hash: TxHash },
	Settled { tx_hash: TxHash },
	Failed { reason: String },
}

impl MintPhase {
	/// Terminal phases release the mint-in-progress lock.
	pub fn is_terminal(&self) -> bool {
		matches!(self, MintPhase::Settled { .. } | MintPhase::Failed { .. })
	}
}

impl fmt::Display for MintPhase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MintPhase::Idle => write!(f, "idle"),
			MintPhase::Validating => write!(f, "validating"),
			MintPhase::Simulating => write!(f, "simulating"),
			MintPhase::Submitting { attempt } => write!(f, "submitting (attempt {})", attempt + 1),
			MintPhase::Confirming { tx_hash } => write!(f, "confirming {}", tx_hash),
			MintPhase::Settled { tx_hash } => write!(f, "settled {}", tx_hash),
			MintPhase::Failed { reason } => write!(f, "failed: {}", reason),
		}
	}
}

/// Outcome of a settled mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintReceipt {
	pub tx_hash: TxHash,
	pub quantity: u64,
	/// Value attached to the transaction in wei.
	pub total_price: U256,
	pub block_number: Option<u64>,
	/// Explorer link for the transaction, when an explorer is configured.
	pub explorer_url: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::Address;

	#[test]
	fn test_input_limit() {
		let snapshot = ChainSnapshot {
			max_per_wallet: 3,
			..Default::default()
		};
		let mut account = AccountState::connected(Address::ZERO);
		assert_eq!(MintRequest::input_limit(&snapshot, &account), 3);

		account.minted_count = 1;
		assert_eq!(MintRequest::input_limit(&snapshot, &account), 2);

		account.minted_count = 7;
		assert_eq!(MintRequest::input_limit(&snapshot, &account), 0);
	}

	#[test]
	fn test_quantity_editing_stays_in_range() {
		let mut request = MintRequest::default();
		request.decrement();
		assert_eq!(request.quantity, 1);

		request.increment(2);
		request.increment(2);
		assert_eq!(request.quantity, 2);

		request.quantity = 9;
		request.clamp(2);
		assert_eq!(request.quantity, 2);

		request.clamp(0);
		assert_eq!(request.quantity, 1);
	}

	#[test]
	fn test_terminal_phases() {
		assert!(!MintPhase::Idle.is_terminal());
		assert!(!MintPhase::Submitting { attempt: 2 }.is_terminal());
		assert!(MintPhase::Failed {
			reason: "nope".into()
		}
		.is_terminal());
		assert!(MintPhase::Settled {
			tx_hash: TxHash::ZERO
		}
		.is_terminal());
	}
}
