//! Chain reader.
//!
//! Reads the collection state and the connected account's minted count
//! from the contract and applies them to the shared state. A refresh never
//! fails towards its caller: read errors are logged and the previous state
//! stays in place.

use crate::state::{RefreshTicket, StateHandle};
use crate::ReadError;
use alloy_primitives::{Address, U256};
use mint_types::ChainSnapshot;
use mint_wallet::{ContractError, MintContractInterface};
use std::future::Future;
use std::sync::Arc;
use tracing::instrument;

/// What a refresh changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshOutcome {
	pub snapshot_applied: bool,
	pub account_applied: bool,
}

/// Read-only access to the collection contract.
pub struct ChainReader {
	contract: Option<Arc<dyn MintContractInterface>>,
	state: StateHandle,
}

impl ChainReader {
	/// Creates a reader; without a contract every refresh is a logged no-op.
	pub fn new(contract: Option<Arc<dyn MintContractInterface>>, state: StateHandle) -> Self {
		Self { contract, state }
	}

	/// Re-reads the collection and, when an account is connected, its minted count.
	#[instrument(skip_all)]
	pub async fn refresh(&self) -> RefreshOutcome {
		let Some(contract) = self.contract.as_deref() else {
			tracing::warn!(error = %ReadError::NotConfigured, "Skipping refresh");
			return RefreshOutcome::default();
		};

		let ticket = self.state.begin_refresh().await;
		let mut outcome = RefreshOutcome::default();

		match read_snapshot(contract).await {
			Ok(snapshot) => {
				tracing::debug!(
					seq = ticket.seq,
					total_supply = snapshot.total_supply,
					max_supply = snapshot.max_supply,
					max_per_wallet = snapshot.max_per_wallet,
					"Collection state read"
				);
				outcome.snapshot_applied = self.state.apply_snapshot(&ticket, snapshot).await;
			},
			Err(e) => {
				tracing::warn!(error = %e, "Collection read failed, keeping previous state");
			},
		}

		if let Some(account) = ticket.account {
			outcome.account_applied = self.refresh_account(contract, &ticket, account).await;
		}

		outcome
	}

	async fn refresh_account(
		&self,
		contract: &dyn MintContractInterface,
		ticket: &RefreshTicket,
		account: Address,
	) -> bool {
		let minted_count = read_minted_count(contract, account).await;
		self.state.apply_minted_count(ticket, minted_count).await
	}
}

/// Reads the four collection fields concurrently.
pub async fn read_snapshot(contract: &dyn MintContractInterface) -> Result<ChainSnapshot, ReadError> {
	let (total_supply, max_supply, unit_price_wei, max_per_wallet) = tokio::try_join!(
		read_uint("totalSupply", contract.total_supply()),
		read_uint("MAX_SUPPLY", contract.max_supply()),
		read_uint("MINT_PRICE", contract.mint_price()),
		read_uint("MAX_PER_WALLET", contract.max_per_wallet()),
	)?;

	Ok(ChainSnapshot {
		total_supply: to_display_int("totalSupply", total_supply)?,
		max_supply: to_display_int("MAX_SUPPLY", max_supply)?,
		unit_price_wei,
		max_per_wallet: to_display_int("MAX_PER_WALLET", max_per_wallet)?,
	})
}

/// Minted count of `account`, falling back to its balance and then to zero.
pub async fn read_minted_count(contract: &dyn MintContractInterface, account: Address) -> u64 {
	let primary = read_uint("mintedCount", contract.minted_count(account))
		.await
		.and_then(|value| to_display_int("mintedCount", value));

	let primary_error = match primary {
		Ok(count) => return count,
		Err(e) => e,
	};
	tracing::debug!(
		account = %account,
		error = %primary_error,
		"mintedCount unavailable, falling back to balanceOf"
	);

	match read_uint("balanceOf", contract.balance_of(account))
		.await
		.and_then(|value| to_display_int("balanceOf", value))
	{
		Ok(count) => count,
		Err(e) => {
			tracing::warn!(account = %account, error = %e, "Minted count unavailable, assuming zero");
			0
		},
	}
}

async fn read_uint<F>(method: &'static str, call: F) -> Result<U256, ReadError>
where
	F: Future<Output = Result<U256, ContractError>>,
{
	call.await.map_err(|e| ReadError::Contract {
		method,
		reason: e.short_message(),
	})
}

/// Converts a contract integer into the display representation without truncation.
fn to_display_int(method: &'static str, value: U256) -> Result<u64, ReadError> {
	u64::try_from(value).map_err(|_| ReadError::Overflow {
		method,
		value: value.to_string(),
	})
}
