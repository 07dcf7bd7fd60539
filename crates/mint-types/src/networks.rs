//! Target network descriptor.
//!
//! The descriptor carries everything a wallet needs to register a network it
//! does not know yet: chain id, display name, native currency metadata, RPC
//! endpoints and the block explorer.

use serde::{Deserialize, Serialize};

/// Metadata of a network's native currency.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NativeCurrency {
	pub name: String,
	pub symbol: String,
	pub decimals: u8,
}

/// The single network the collection is deployed on.
///
/// # Fields
///
/// * `chain_id` - EIP-155 chain id the wallet must be switched to
/// * `name` - Human-readable network name
/// * `native_currency` - Currency used to pay for mints
/// * `rpc_urls` - RPC endpoints offered to the wallet when adding the network
/// * `explorer_url` - Block explorer base URL, if any
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TargetNetwork {
	pub chain_id: u64,
	pub name: String,
	pub native_currency: NativeCurrency,
	pub rpc_urls: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub explorer_url: Option<String>,
}

impl TargetNetwork {
	/// Monad testnet, the network the collection ships on.
	pub fn monad_testnet() -> Self {
		Self {
			chain_id: 10143,
			name: "Monad Testnet".to_string(),
			native_currency: NativeCurrency {
				name: "Monad".to_string(),
				symbol: "MON".to_string(),
				decimals: 18,
			},
			rpc_urls: vec!["https://testnet-rpc.monad.xyz".to_string()],
			explorer_url: Some("https://testnet.monadexplorer.com".to_string()),
		}
	}

	/// Chain id as the `0x`-prefixed hex string wallets expect.
	pub fn chain_id_hex(&self) -> String {
		format!("{:#x}", self.chain_id)
	}

	/// First configured RPC endpoint.
	pub fn primary_rpc_url(&self) -> Option<&str> {
		self.rpc_urls.first().map(String::as_str)
	}

	/// Returns a copy whose primary RPC endpoint is `url`, keeping the rest as fallbacks.
	pub fn with_rpc_override(mut self, url: impl Into<String>) -> Self {
		let url = url.into();
		self.rpc_urls.retain(|existing| existing != &url);
		self.rpc_urls.insert(0, url);
		self
	}
}

impl Default for TargetNetwork {
	fn default() -> Self {
		Self::monad_testnet()
	}
}
