//! Collection state read from the mint contract.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Immutable view of the collection's on-chain state at the time of a read.
///
/// A snapshot is replaced wholesale on every successful refresh. The
/// relation `total_supply <= max_supply` is enforced by the contract and is
/// not re-checked here; every derived quantity saturates instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSnapshot {
	/// Number of tokens minted so far.
	pub total_supply: u64,
	/// Hard cap of the collection as reported by the contract.
	pub max_supply: u64,
	/// Price of a single token in wei.
	pub unit_price_wei: U256,
	/// Maximum number of tokens a single wallet may ever mint.
	pub max_per_wallet: u64,
}

impl ChainSnapshot {
	/// Tokens that can still be minted before the cap is reached.
	pub fn remaining_supply(&self) -> u64 {
		self.max_supply.saturating_sub(self.total_supply)
	}

	/// Returns true when the collection is sold out.
	pub fn is_sold_out(&self) -> bool {
		self.remaining_supply() == 0
	}

	/// Price for `quantity` tokens, or `None` on overflow.
	pub fn total_price(&self, quantity: u64) -> Option<U256> {
		self.unit_price_wei.checked_mul(U256::from(quantity))
	}
}
