//! Common types for the mint client.
//!
//! This crate defines the data model shared by every component of the mint
//! client: the chain snapshot read from the collection contract, the
//! connected account, the user's mint request, the mint lifecycle phases,
//! the events published on the application bus and the descriptor of the
//! target network.

/// Connected-account state.
pub mod account;
/// Events published on the application event bus.
pub mod events;
/// Mint request, lifecycle phases and receipts.
pub mod mint;
/// Target network descriptor used by the add-network fallback.
pub mod networks;
/// Secure string type for handling private keys.
pub mod secret_string;
/// Contract-derived collection state.
pub mod snapshot;
/// Formatting helpers and test builders.
pub mod utils;

pub use account::AccountState;
pub use events::MintEvent;
pub use mint::{MintPhase, MintReceipt, MintRequest};
pub use networks::{NativeCurrency, TargetNetwork};
pub use secret_string::SecretString;
pub use snapshot::ChainSnapshot;
pub use utils::formatting::{explorer_tx_url, format_wei, format_wei_str, shorten_address};

/// Re-exported primitive types so downstream crates agree on a single version.
pub use alloy_primitives::{Address, TxHash, U256};
