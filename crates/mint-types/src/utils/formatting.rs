//! String formatting utilities.
//!
//! Provides the display renderings of wei amounts, addresses and explorer
//! links. Amounts are rendered with integer arithmetic only; the fractional
//! part is truncated, never rounded.

use alloy_primitives::{Address, TxHash, U256};

/// Renders a wei amount as `whole.fraction` with exactly `fraction_digits` digits.
///
/// Lower-order digits beyond `fraction_digits` are dropped, so
/// `1.23456` renders as `1.2345` with four digits.
///
/// # Arguments
///
/// * `amount` - Amount in the currency's smallest unit
/// * `decimals` - Number of decimals of the currency (18 for native EVM currencies)
/// * `fraction_digits` - Number of fractional digits to keep
pub fn format_wei(amount: U256, decimals: u8, fraction_digits: usize) -> String {
	let divisor = U256::from(10u8).pow(U256::from(decimals));
	let whole = amount / divisor;

	if fraction_digits == 0 {
		return whole.to_string();
	}

	let fractional = amount % divisor;
	let mut digits = if decimals == 0 {
		String::new()
	} else {
		format!("{:0>width$}", fractional.to_string(), width = decimals as usize)
	};
	digits.truncate(fraction_digits);
	while digits.len() < fraction_digits {
		digits.push('0');
	}

	format!("{}.{}", whole, digits)
}

/// Renders a decimal (or `0x` hex) amount string, falling back to `"0"` when unparsable.
pub fn format_wei_str(amount: &str, decimals: u8, fraction_digits: usize) -> String {
	let amount = amount.trim();
	if amount.is_empty() {
		return "0".to_string();
	}
	match amount.parse::<U256>() {
		Ok(value) => format_wei(value, decimals, fraction_digits),
		Err(_) => "0".to_string(),
	}
}

/// Shortens an address to `0x1234…abcd` using its checksummed form.
pub fn shorten_address(address: &Address) -> String {
	let checksummed = address.to_checksum(None);
	format!("{}…{}", &checksummed[..6], &checksummed[checksummed.len() - 4..])
}

/// Builds the explorer link for a transaction.
pub fn explorer_tx_url(explorer_base: &str, tx_hash: &TxHash) -> String {
	format!("{}/tx/{}", explorer_base.trim_end_matches('/'), tx_hash)
}
