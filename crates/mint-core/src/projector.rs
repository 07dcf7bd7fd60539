//! View state projection.
//!
//! Pure derivation of everything a front end displays from the shared
//! state and the user's pending request. No I/O and no failure modes:
//! missing or malformed values render as zero.

use crate::state::AppState;
use alloy_primitives::U256;
use mint_config::Config;
use mint_types::{
	explorer_tx_url, format_wei, format_wei_str, shorten_address, ChainSnapshot, MintPhase,
	MintRequest,
};
use std::fmt;

/// Display-only settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySettings {
	/// Ceiling applied to the displayed max supply.
	pub max_supply_ceiling: u64,
	pub fraction_digits: usize,
	pub currency_symbol: String,
	pub decimals: u8,
	pub explorer_url: Option<String>,
	/// Set when the deployment is missing required configuration.
	pub config_error: Option<String>,
}

impl Default for DisplaySettings {
	fn default() -> Self {
		Self {
			max_supply_ceiling: 500,
			fraction_digits: 4,
			currency_symbol: "MON".to_string(),
			decimals: 18,
			explorer_url: None,
			config_error: None,
		}
	}
}

impl From<&Config> for DisplaySettings {
	fn from(config: &Config) -> Self {
		Self {
			max_supply_ceiling: config.display.max_supply_ceiling,
			fraction_digits: config.display.fraction_digits,
			currency_symbol: config.network.native_currency.symbol.clone(),
			decimals: config.network.native_currency.decimals,
			explorer_url: config.network.explorer_url.clone(),
			config_error: config.config_error(),
		}
	}
}

impl DisplaySettings {
	/// Renders a wei amount as `"<whole>.<fraction> <symbol>"`, truncated.
	pub fn format_amount(&self, amount: U256) -> String {
		format!(
			"{} {}",
			format_wei(amount, self.decimals, self.fraction_digits),
			self.currency_symbol
		)
	}

	/// Like [`format_amount`](Self::format_amount) for a decimal string;
	/// unparsable input renders as zero.
	pub fn format_amount_str(&self, amount: &str) -> String {
		format!(
			"{} {}",
			format_wei_str(amount, self.decimals, self.fraction_digits),
			self.currency_symbol
		)
	}
}

/// Mint progress as a whole percentage in `0..=100`, rounded half up.
///
/// A zero `max_supply` yields 0.
pub fn progress_percent(total_supply: u64, max_supply: u64) -> u8 {
	if max_supply == 0 {
		return 0;
	}
	let total = u128::from(total_supply.min(max_supply));
	let max = u128::from(max_supply);
	((total * 200 + max) / (max * 2)) as u8
}

/// Max supply as displayed, clamped to the configured ceiling.
pub fn display_max_supply(max_supply: u64, ceiling: u64) -> u64 {
	max_supply.min(ceiling)
}

/// Why the mint control is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintBlockedReason {
	NotConfigured,
	NoWallet,
	MintInProgress,
	Loading,
	AllowanceExhausted,
	SupplyExhausted,
}

impl fmt::Display for MintBlockedReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let text = match self {
			MintBlockedReason::NotConfigured => "contract not configured",
			MintBlockedReason::NoWallet => "connect wallet",
			MintBlockedReason::MintInProgress => "minting...",
			MintBlockedReason::Loading => "loading collection",
			MintBlockedReason::AllowanceExhausted => "max per wallet reached",
			MintBlockedReason::SupplyExhausted => "sold out",
		};
		f.write_str(text)
	}
}

/// Everything the front end renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
	/// Shortened connected address.
	pub account: Option<String>,
	pub connected: bool,
	pub total_supply: u64,
	pub display_max_supply: u64,
	pub progress_percent: u8,
	pub unit_price: String,
	/// Price of the pending request.
	pub total_price: String,
	/// Minted count clamped to the per-wallet cap.
	pub minted_count: u64,
	pub max_per_wallet: u64,
	pub remaining_allowance: u64,
	/// Upper bound of the quantity input.
	pub max_quantity: u64,
	/// Pending quantity, kept within the input bounds.
	pub quantity: u64,
	pub mint_enabled: bool,
	pub mint_blocked_reason: Option<MintBlockedReason>,
	pub config_error: Option<String>,
	pub status: String,
	pub phase: MintPhase,
	pub last_tx_url: Option<String>,
}

impl ViewState {
	pub fn project(state: &AppState, request: &MintRequest, settings: &DisplaySettings) -> Self {
		let snapshot = state.snapshot.clone().unwrap_or_default();
		let account = &state.account;

		let display_max = display_max_supply(snapshot.max_supply, settings.max_supply_ceiling);
		let max_quantity = MintRequest::input_limit(&snapshot, account);

		let mut request = *request;
		request.clamp(max_quantity);
		let total_price = snapshot
			.total_price(request.quantity)
			.map(|price| settings.format_amount(price))
			.unwrap_or_else(|| settings.format_amount(U256::ZERO));

		let blocked = blocked_reason(state, &snapshot, settings);

		Self {
			account: account.address.as_ref().map(shorten_address),
			connected: account.is_connected(),
			total_supply: snapshot.total_supply,
			display_max_supply: display_max,
			progress_percent: progress_percent(snapshot.total_supply, display_max),
			unit_price: settings.format_amount(snapshot.unit_price_wei),
			total_price,
			minted_count: account.clamped_minted(snapshot.max_per_wallet),
			max_per_wallet: snapshot.max_per_wallet,
			remaining_allowance: account.remaining_allowance(snapshot.max_per_wallet),
			max_quantity,
			quantity: request.quantity,
			mint_enabled: blocked.is_none(),
			mint_blocked_reason: blocked,
			config_error: settings.config_error.clone(),
			status: state.status.clone(),
			phase: state.phase.clone(),
			last_tx_url: match (&settings.explorer_url, &state.last_tx_hash) {
				(Some(base), Some(tx_hash)) => Some(explorer_tx_url(base, tx_hash)),
				_ => None,
			},
		}
	}
}

fn blocked_reason(
	state: &AppState,
	snapshot: &ChainSnapshot,
	settings: &DisplaySettings,
) -> Option<MintBlockedReason> {
	if settings.config_error.is_some() {
		Some(MintBlockedReason::NotConfigured)
	} else if !state.account.is_connected() {
		Some(MintBlockedReason::NoWallet)
	} else if state.mint_in_progress {
		Some(MintBlockedReason::MintInProgress)
	} else if state.snapshot.is_none() {
		Some(MintBlockedReason::Loading)
	} else if state.account.remaining_allowance(snapshot.max_per_wallet) == 0 {
		Some(MintBlockedReason::AllowanceExhausted)
	} else if snapshot.is_sold_out() {
		Some(MintBlockedReason::SupplyExhausted)
	} else {
		None
	}
}
