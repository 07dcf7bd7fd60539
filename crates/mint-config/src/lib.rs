//! Configuration module for the mint client.
//!
//! This module provides structures and utilities for managing the client's
//! configuration. It supports loading configuration from TOML files, resolving
//! `${VAR}` references against the environment, applying the well-known
//! `MINT_*` environment overrides and validating the result.
//!
//! A missing contract address is deliberately not a load error: the client
//! starts in a visible configuration-error state instead, see
//! [`Config::config_error`].

use alloy_primitives::Address;
use mint_types::{SecretString, TargetNetwork};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable names recognised as overrides.
pub mod env_vars {
	/// Address of the deployed collection contract.
	pub const CONTRACT_ADDRESS: &str = "MINT_CONTRACT_ADDRESS";
	/// RPC endpoint offered to the wallet when it has to add the target network.
	pub const RPC_URL: &str = "MINT_RPC_URL";
	/// Comma-separated private keys for the local wallet.
	pub const PRIVATE_KEYS: &str = "MINT_PRIVATE_KEYS";
	/// RPC endpoint of the chain the local wallet starts on.
	pub const WALLET_RPC_URL: &str = "MINT_WALLET_RPC_URL";
}

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the mint client.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
	/// Network the collection is deployed on.
	#[serde(default)]
	pub network: TargetNetwork,
	/// Deployed collection contract.
	#[serde(default)]
	pub contract: ContractConfig,
	/// Display-only settings.
	#[serde(default)]
	pub display: DisplayConfig,
	/// Mint retry and confirmation settings.
	#[serde(default)]
	pub mint: MintConfig,
	/// Local signing wallet used by the command-line front end.
	#[serde(default)]
	pub wallet: WalletConfig,
}

/// Deployed collection contract.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContractConfig {
	/// Contract address; empty or absent leaves the client unconfigured.
	#[serde(default, deserialize_with = "deserialize_optional_address")]
	pub address: Option<Address>,
}

/// Display-only settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
	/// Ceiling applied to the displayed max supply, independent of the on-chain cap.
	#[serde(default = "default_max_supply_ceiling")]
	pub max_supply_ceiling: u64,
	/// Fractional digits kept when rendering currency amounts.
	#[serde(default = "default_fraction_digits")]
	pub fraction_digits: usize,
}

impl Default for DisplayConfig {
	fn default() -> Self {
		Self {
			max_supply_ceiling: default_max_supply_ceiling(),
			fraction_digits: default_fraction_digits(),
		}
	}
}

fn default_max_supply_ceiling() -> u64 {
	500
}

fn default_fraction_digits() -> usize {
	4
}

/// Mint retry and confirmation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MintConfig {
	/// Total submission attempts when the RPC rate-limits us.
	#[serde(default = "default_max_attempts")]
	pub max_attempts: u32,
	/// First backoff delay; doubled on every further attempt.
	#[serde(default = "default_base_backoff_ms")]
	pub base_backoff_ms: u64,
	/// Confirmations required before a mint is considered settled.
	#[serde(default = "default_confirmations")]
	pub confirmations: u64,
	/// How long to wait for the confirmations.
	#[serde(default = "default_confirmation_timeout_seconds")]
	pub confirmation_timeout_seconds: u64,
}

impl Default for MintConfig {
	fn default() -> Self {
		Self {
			max_attempts: default_max_attempts(),
			base_backoff_ms: default_base_backoff_ms(),
			confirmations: default_confirmations(),
			confirmation_timeout_seconds: default_confirmation_timeout_seconds(),
		}
	}
}

fn default_max_attempts() -> u32 {
	3
}

fn default_base_backoff_ms() -> u64 {
	500
}

fn default_confirmations() -> u64 {
	1
}

fn default_confirmation_timeout_seconds() -> u64 {
	120
}

/// Local signing wallet used by the command-line front end.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WalletConfig {
	/// Chain the wallet is on at startup; defaults to the target network's RPC.
	#[serde(default)]
	pub rpc_url: Option<String>,
	/// Signer keys, usually supplied through `MINT_PRIVATE_KEYS`.
	#[serde(default, skip_serializing)]
	pub private_keys: Vec<SecretString>,
}

fn deserialize_optional_address<'de, D>(deserializer: D) -> Result<Option<Address>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw: Option<String> = Option::deserialize(deserializer)?;
	match raw.as_deref().map(str::trim) {
		None | Some("") => Ok(None),
		Some(value) => value
			.parse::<Address>()
			.map(Some)
			.map_err(|e| serde::de::Error::custom(format!("Invalid contract address '{value}': {e}"))),
	}
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {e}")))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)))
				},
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a file.
	///
	/// Environment variables are first loaded from a `.env` file in the
	/// current directory when one exists, then `${VAR}` references are
	/// resolved and the `MINT_*` overrides applied.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let _ = dotenvy::dotenv();

		let path = path.as_ref();
		let contents = tokio::fs::read_to_string(path).await?;
		tracing::debug!(path = %path.display(), "Loaded configuration file");
		contents.parse()
	}

	/// Builds a configuration purely from defaults and the environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		let _ = dotenvy::dotenv();

		let mut config = Config::default();
		config.apply_overrides_from(|name| std::env::var(name).ok())?;
		config.validate()?;
		Ok(config)
	}

	/// Applies the `MINT_*` overrides using `lookup` to read variables.
	pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

		if let Some(address) = non_empty(env_vars::CONTRACT_ADDRESS) {
			let parsed = address.trim().parse::<Address>().map_err(|e| {
				ConfigError::Validation(format!(
					"{} is not a valid address: {e}",
					env_vars::CONTRACT_ADDRESS
				))
			})?;
			self.contract.address = Some(parsed);
		}

		if let Some(url) = non_empty(env_vars::RPC_URL) {
			self.network = std::mem::take(&mut self.network).with_rpc_override(url.trim());
		}

		if let Some(url) = non_empty(env_vars::WALLET_RPC_URL) {
			self.wallet.rpc_url = Some(url.trim().to_string());
		}

		if let Some(keys) = non_empty(env_vars::PRIVATE_KEYS) {
			self.wallet.private_keys = keys
				.split(',')
				.map(str::trim)
				.filter(|key| !key.is_empty())
				.map(SecretString::from)
				.collect();
		}

		Ok(())
	}

	/// RPC endpoint the local wallet starts on.
	pub fn wallet_rpc_url(&self) -> Option<&str> {
		self.wallet
			.rpc_url
			.as_deref()
			.or_else(|| self.network.primary_rpc_url())
	}

	/// Human-readable reason the client cannot mint, if it is misconfigured.
	pub fn config_error(&self) -> Option<String> {
		match self.contract.address {
			Some(_) => None,
			None => Some(format!(
				"Contract address is not configured. Set {} or [contract].address",
				env_vars::CONTRACT_ADDRESS
			)),
		}
	}

	/// Validates the configuration.
	///
	/// Checks the network descriptor, display and retry settings. The
	/// contract address is not checked here, see [`Config::config_error`].
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.network.chain_id == 0 {
			return Err(ConfigError::Validation("network.chain_id cannot be 0".into()));
		}
		if self.network.name.trim().is_empty() {
			return Err(ConfigError::Validation("network.name cannot be empty".into()));
		}
		if self.network.rpc_urls.is_empty() {
			return Err(ConfigError::Validation(
				"network.rpc_urls must contain at least one endpoint".into(),
			));
		}
		for url in self.network.rpc_urls.iter().chain(self.wallet.rpc_url.iter()) {
			if !(url.starts_with("http://") || url.starts_with("https://")) {
				return Err(ConfigError::Validation(format!(
					"RPC URL must use http or https: {url}"
				)));
			}
		}
		if self.network.native_currency.symbol.trim().is_empty() {
			return Err(ConfigError::Validation(
				"network.native_currency.symbol cannot be empty".into(),
			));
		}
		// 10^78 no longer fits in a U256
		if self.network.native_currency.decimals > 77 {
			return Err(ConfigError::Validation(format!(
				"network.native_currency.decimals too large: {}",
				self.network.native_currency.decimals
			)));
		}
		if self.display.max_supply_ceiling == 0 {
			return Err(ConfigError::Validation(
				"display.max_supply_ceiling must be greater than 0".into(),
			));
		}
		if self.mint.max_attempts == 0 {
			return Err(ConfigError::Validation(
				"mint.max_attempts must be at least 1".into(),
			));
		}
		if self.mint.max_attempts > 10 {
			return Err(ConfigError::Validation(format!(
				"mint.max_attempts must be at most 10, got {}",
				self.mint.max_attempts
			)));
		}
		if self.mint.confirmation_timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"mint.confirmation_timeout_seconds must be greater than 0".into(),
			));
		}
		Ok(())
	}
}

/// Parses a TOML document, resolving `${VAR}` references and applying the
/// `MINT_*` overrides before validation.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let mut config: Config = toml::from_str(&resolved)?;
		config.apply_overrides_from(|name| std::env::var(name).ok())?;
		config.validate()?;
		Ok(config)
	}
}
