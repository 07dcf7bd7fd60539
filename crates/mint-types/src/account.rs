//! Connected-account state.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Identity of the connected wallet and how many tokens it has minted.
///
/// `address` is `None` until a wallet connects. `minted_count` is refetched
/// whenever the address changes and after every settled mint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
	pub address: Option<Address>,
	pub minted_count: u64,
}

impl AccountState {
	/// Creates the state for a freshly connected account.
	pub fn connected(address: Address) -> Self {
		Self {
			address: Some(address),
			minted_count: 0,
		}
	}

	pub fn is_connected(&self) -> bool {
		self.address.is_some()
	}

	/// Minted count clamped to the per-wallet cap for display.
	pub fn clamped_minted(&self, max_per_wallet: u64) -> u64 {
		self.minted_count.min(max_per_wallet)
	}

	/// Tokens this account may still mint under the per-wallet cap.
	pub fn remaining_allowance(&self, max_per_wallet: u64) -> u64 {
		max_per_wallet.saturating_sub(self.minted_count)
	}
}
