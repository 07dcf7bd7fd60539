//! Builder for chain snapshots.

use crate::ChainSnapshot;
use alloy_primitives::U256;

/// One whole native token in wei.
pub const ONE_TOKEN: u128 = 1_000_000_000_000_000_000;

/// Builder for creating `ChainSnapshot` instances with a fluent API.
///
/// Defaults describe a fresh 500-token collection priced at one token per
/// mint with a per-wallet cap of two.
#[derive(Debug, Clone)]
pub struct ChainSnapshotBuilder {
	total_supply: u64,
	max_supply: u64,
	unit_price_wei: U256,
	max_per_wallet: u64,
}

impl Default for ChainSnapshotBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ChainSnapshotBuilder {
	pub fn new() -> Self {
		Self {
			total_supply: 0,
			max_supply: 500,
			unit_price_wei: U256::from(ONE_TOKEN),
			max_per_wallet: 2,
		}
	}

	pub fn total_supply(mut self, total_supply: u64) -> Self {
		self.total_supply = total_supply;
		self
	}

	pub fn max_supply(mut self, max_supply: u64) -> Self {
		self.max_supply = max_supply;
		self
	}

	pub fn unit_price_wei(mut self, price: U256) -> Self {
		self.unit_price_wei = price;
		self
	}

	pub fn max_per_wallet(mut self, max_per_wallet: u64) -> Self {
		self.max_per_wallet = max_per_wallet;
		self
	}

	pub fn build(self) -> ChainSnapshot {
		ChainSnapshot {
			total_supply: self.total_supply,
			max_supply: self.max_supply,
			unit_price_wei: self.unit_price_wei,
			max_per_wallet: self.max_per_wallet,
		}
	}
}
