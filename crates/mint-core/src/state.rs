//! Shared application state.
//!
//! One [`AppState`] is owned by the application and shared by handle. The
//! chain reader is the only writer of the snapshot and the minted count,
//! the session the only writer of the account address, and the
//! orchestrator the only writer of the mint phase. Every write publishes
//! the matching [`MintEvent`].
//!
//! Refreshes are fenced rather than cancelled: each one takes a
//! [`RefreshTicket`] before it starts reading, and its results are only
//! applied if nothing newer landed in the meantime.

use crate::engine::event_bus::EventBus;
use alloy_primitives::{Address, TxHash};
use mint_types::{AccountState, ChainSnapshot, MintEvent, MintPhase};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};

/// Everything the projector needs to render the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
	/// Last snapshot read from the contract; `None` until the first successful read.
	pub snapshot: Option<ChainSnapshot>,
	pub account: AccountState,
	/// Current status line; overwritten, never appended.
	pub status: String,
	pub phase: MintPhase,
	pub mint_in_progress: bool,
	pub last_tx_hash: Option<TxHash>,
	/// Bumped on every account change.
	account_epoch: u64,
	/// Sequence number of the refresh whose snapshot is shown.
	snapshot_seq: u64,
	/// Sequence number of the refresh whose minted count is shown.
	account_seq: u64,
}

impl Default for AppState {
	fn default() -> Self {
		Self {
			snapshot: None,
			account: AccountState::default(),
			status: String::new(),
			phase: MintPhase::Idle,
			mint_in_progress: false,
			last_tx_hash: None,
			account_epoch: 0,
			snapshot_seq: 0,
			account_seq: 0,
		}
	}
}

impl AppState {
	pub fn account_epoch(&self) -> u64 {
		self.account_epoch
	}
}

/// Identity of one refresh, taken before its reads start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
	pub seq: u64,
	pub epoch: u64,
	pub account: Option<Address>,
}

/// Cloneable handle to the shared state and the event bus.
#[derive(Clone)]
pub struct StateHandle {
	state: Arc<RwLock<AppState>>,
	events: EventBus,
	next_seq: Arc<AtomicU64>,
}

impl StateHandle {
	pub fn new(events: EventBus) -> Self {
		Self {
			state: Arc::new(RwLock::new(AppState::default())),
			events,
			next_seq: Arc::new(AtomicU64::new(1)),
		}
	}

	pub fn events(&self) -> &EventBus {
		&self.events
	}

	/// Read access to the live state.
	pub async fn read(&self) -> RwLockReadGuard<'_, AppState> {
		self.state.read().await
	}

	/// Copy of the current state.
	pub async fn snapshot(&self) -> AppState {
		self.state.read().await.clone()
	}

	/// Starts a refresh scoped to the current account.
	pub async fn begin_refresh(&self) -> RefreshTicket {
		let state = self.state.read().await;
		RefreshTicket {
			seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
			epoch: state.account_epoch,
			account: state.account.address,
		}
	}

	/// Applies a snapshot unless a newer refresh already applied one.
	pub async fn apply_snapshot(&self, ticket: &RefreshTicket, snapshot: ChainSnapshot) -> bool {
		let mut state = self.state.write().await;
		if ticket.seq <= state.snapshot_seq {
			tracing::debug!(
				seq = ticket.seq,
				applied = state.snapshot_seq,
				"Dropping stale snapshot"
			);
			return false;
		}
		state.snapshot_seq = ticket.seq;
		state.snapshot = Some(snapshot.clone());
		drop(state);

		self.events.publish(MintEvent::SnapshotRefreshed(snapshot)).ok();
		true
	}

	/// Applies a minted count if the account it was read for is still connected.
	pub async fn apply_minted_count(&self, ticket: &RefreshTicket, minted_count: u64) -> bool {
		let mut state = self.state.write().await;
		let current = ticket.epoch == state.account_epoch
			&& ticket.account.is_some()
			&& ticket.account == state.account.address
			&& ticket.seq > state.account_seq;
		if !current {
			tracing::debug!(
				seq = ticket.seq,
				epoch = ticket.epoch,
				current_epoch = state.account_epoch,
				"Dropping stale minted count"
			);
			return false;
		}
		state.account_seq = ticket.seq;
		state.account.minted_count = minted_count;
		let account = state.account.clone();
		drop(state);

		self.events.publish(MintEvent::AccountRefreshed(account)).ok();
		true
	}

	/// Replaces the connected account; returns false if it did not change.
	///
	/// A change resets the minted count until the next refresh and
	/// invalidates every refresh still in flight for the old account.
	pub async fn set_account(&self, address: Option<Address>) -> bool {
		let mut state = self.state.write().await;
		if state.account.address == address {
			return false;
		}
		state.account_epoch += 1;
		state.account = AccountState {
			address,
			minted_count: 0,
		};
		drop(state);

		self.events.publish(MintEvent::AccountChanged(address)).ok();
		true
	}

	pub async fn set_status(&self, status: impl Into<String>) {
		let status = status.into();
		self.state.write().await.status = status.clone();
		self.events.publish(MintEvent::StatusChanged(status)).ok();
	}

	pub async fn set_phase(&self, phase: MintPhase) {
		self.state.write().await.phase = phase.clone();
		self.events.publish(MintEvent::PhaseChanged(phase)).ok();
	}

	pub async fn set_mint_in_progress(&self, in_progress: bool) {
		self.state.write().await.mint_in_progress = in_progress;
	}

	pub async fn set_last_tx(&self, tx_hash: TxHash) {
		self.state.write().await.last_tx_hash = Some(tx_hash);
	}

	/// Installs a known snapshot and account without going through a refresh.
	#[cfg(test)]
	pub(crate) async fn seed(&self, snapshot: ChainSnapshot, account: AccountState) {
		let mut state = self.state.write().await;
		state.snapshot = Some(snapshot);
		if state.account.address != account.address {
			state.account_epoch += 1;
		}
		state.account = account;
	}
}
