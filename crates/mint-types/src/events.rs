//! Events published on the application event bus.
//!
//! The wallet session, chain reader and mint orchestrator publish these so
//! the presentation layer can re-render without polling shared state.

use crate::{AccountState, ChainSnapshot, MintPhase};
use alloy_primitives::Address;

/// Application-level events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintEvent {
	/// The wallet reported a new selected account, or none.
	AccountChanged(Option<Address>),
	/// A refresh replaced the chain snapshot.
	SnapshotRefreshed(ChainSnapshot),
	/// A refresh updated the connected account's minted count.
	AccountRefreshed(AccountState),
	/// The active mint moved to a new phase.
	PhaseChanged(MintPhase),
	/// The status line was overwritten.
	StatusChanged(String),
}
