//! Builder for target network descriptors.

use crate::{NativeCurrency, TargetNetwork};

/// Builder for creating `TargetNetwork` instances with a fluent API.
///
/// Starts from a local development chain so tests never point at a public
/// endpoint by accident.
#[derive(Debug, Clone)]
pub struct TargetNetworkBuilder {
	network: TargetNetwork,
}

impl Default for TargetNetworkBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl TargetNetworkBuilder {
	pub fn new() -> Self {
		Self {
			network: TargetNetwork {
				chain_id: 31337,
				name: "Local Testnet".to_string(),
				native_currency: NativeCurrency {
					name: "Monad".to_string(),
					symbol: "MON".to_string(),
					decimals: 18,
				},
				rpc_urls: vec!["http://127.0.0.1:8545".to_string()],
				explorer_url: Some("https://explorer.local".to_string()),
			},
		}
	}

	pub fn chain_id(mut self, chain_id: u64) -> Self {
		self.network.chain_id = chain_id;
		self
	}

	pub fn name<S: Into<String>>(mut self, name: S) -> Self {
		self.network.name = name.into();
		self
	}

	pub fn rpc_url<S: Into<String>>(mut self, url: S) -> Self {
		self.network.rpc_urls = vec![url.into()];
		self
	}

	pub fn explorer_url(mut self, url: Option<&str>) -> Self {
		self.network.explorer_url = url.map(str::to_string);
		self
	}

	pub fn build(self) -> TargetNetwork {
		self.network
	}
}
