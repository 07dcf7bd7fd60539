//! Terminal output.
//!
//! Renders projected view state, receipts and the network descriptor with
//! colored headers and status symbols.

use colored::Colorize;
use mint_core::{DisplaySettings, ViewState};
use mint_types::{MintPhase, MintReceipt, TargetNetwork};

/// Width of the mint progress bar in cells.
const PROGRESS_WIDTH: usize = 30;

pub struct Display;

impl Display {
	/// Section header with underline.
	pub fn header(text: &str) {
		println!("\n{}", text.bold().cyan());
		println!("{}", "─".repeat(text.chars().count()).cyan());
	}

	pub fn success(message: &str) {
		println!("{} {}", "✓".green().bold(), message);
	}

	/// Error message on stderr.
	pub fn error(message: &str) {
		eprintln!("{} {}", "✗".red().bold(), message.red());
	}

	pub fn warning(message: &str) {
		println!("{} {}", "⚠".yellow().bold(), message.yellow());
	}

	pub fn info(message: &str) {
		println!("{} {}", "ℹ".blue().bold(), message);
	}

	pub fn kv(key: &str, value: &str) {
		println!("  {} {}", format!("{}:", key).bold(), value);
	}

	pub fn section(title: &str) {
		println!("\n{}", format!("▸ {}", title).bold());
	}

	/// The mint panel.
	pub fn view(view: &ViewState) {
		Self::header("Mint");

		if let Some(error) = &view.config_error {
			Self::error(error);
		}

		Self::kv(
			"Minted",
			&format!("{} / {}", view.total_supply, view.display_max_supply),
		);
		println!("  {}", progress_bar(view.progress_percent));
		Self::kv("Price", &view.unit_price);

		Self::section("Wallet");
		match &view.account {
			Some(account) => {
				Self::kv("Account", account);
				Self::kv(
					"Your mints",
					&format!("{} / {}", view.minted_count, view.max_per_wallet),
				);
				Self::kv("Remaining", &view.remaining_allowance.to_string());
			},
			None => Self::kv("Account", &"not connected".dimmed().to_string()),
		}

		Self::section("Order");
		Self::kv(
			"Quantity",
			&format!("{} (max {})", view.quantity, view.max_quantity),
		);
		Self::kv("Total", &view.total_price);
		match view.mint_blocked_reason {
			None => Self::kv("Mint", &"ready".green().to_string()),
			Some(reason) => Self::kv("Mint", &reason.to_string().yellow().to_string()),
		}

		if !view.status.is_empty() {
			Self::section("Status");
			println!("  {}", view.status);
		}
		if let Some(url) = &view.last_tx_url {
			Self::kv("Last transaction", url);
		}
	}

	/// A settled mint.
	pub fn receipt(receipt: &MintReceipt, settings: &DisplaySettings) {
		Self::success(&format!(
			"Minted {} for {}",
			receipt.quantity,
			settings.format_amount(receipt.total_price)
		));
		Self::kv("Transaction", &receipt.tx_hash.to_string());
		if let Some(block) = receipt.block_number {
			Self::kv("Block", &block.to_string());
		}
		if let Some(url) = &receipt.explorer_url {
			Self::kv("Explorer", url);
		}
	}

	pub fn phase(phase: &MintPhase) {
		match phase {
			MintPhase::Idle | MintPhase::Settled { .. } | MintPhase::Failed { .. } => {},
			other => Self::info(&format!("Mint {}", other)),
		}
	}

	pub fn network(network: &TargetNetwork, settings: &DisplaySettings) {
		Self::header(&network.name);
		Self::kv(
			"Chain ID",
			&format!("{} ({})", network.chain_id, network.chain_id_hex()),
		);
		Self::kv(
			"Currency",
			&format!(
				"{} ({}, {} decimals)",
				network.native_currency.name,
				network.native_currency.symbol,
				network.native_currency.decimals
			),
		);
		for (index, url) in network.rpc_urls.iter().enumerate() {
			let label = if index == 0 { "RPC" } else { "RPC fallback" };
			Self::kv(label, url);
		}
		if let Some(explorer) = &network.explorer_url {
			Self::kv("Explorer", explorer);
		}
		Self::kv("Display ceiling", &settings.max_supply_ceiling.to_string());
	}
}

/// Text progress bar, e.g. `[██████░░░░] 60%`.
pub fn progress_bar(percent: u8) -> String {
	let percent = usize::from(percent.min(100));
	let filled = percent * PROGRESS_WIDTH / 100;
	format!(
		"[{}{}] {}%",
		"█".repeat(filled).green(),
		"░".repeat(PROGRESS_WIDTH - filled).dimmed(),
		percent
	)
}
