//! Collection contract access through Alloy.
//!
//! Reads, dry runs and submissions all go through the local wallet's active
//! provider, so a chain switch in the wallet is picked up by the next call
//! without rebuilding this type.

use super::local_wallet::LocalWallet;
use crate::{ConfirmedTx, ContractError, MintCall, MintContractInterface};
use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_provider::{DynProvider, PendingTransactionConfig, PendingTransactionError, Provider};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

sol! {
	interface IMintCollection {
		function totalSupply() external view returns (uint256);
		function MAX_SUPPLY() external view returns (uint256);
		function MINT_PRICE() external view returns (uint256);
		function MAX_PER_WALLET() external view returns (uint256);
		function mintedCount(address account) external view returns (uint256);
		function balanceOf(address owner) external view returns (uint256);
		function mint(uint256 quantity) external payable;
	}
}

/// Alloy-backed access to the deployed collection contract.
pub struct AlloyMintContract {
	wallet: Arc<LocalWallet>,
	address: Address,
}

impl AlloyMintContract {
	pub fn new(wallet: Arc<LocalWallet>, address: Address) -> Self {
		Self { wallet, address }
	}

	/// Address of the collection contract.
	pub fn address(&self) -> Address {
		self.address
	}

	async fn provider(&self) -> Result<DynProvider, ContractError> {
		Ok(self.wallet.active_provider().await?)
	}

	/// Executes a read-only call and returns the raw answer.
	async fn read(&self, method: &str, data: Vec<u8>) -> Result<Bytes, ContractError> {
		let provider = self.provider().await?;
		let request = TransactionRequest::default()
			.to(self.address)
			.input(data.into());

		provider.call(request).await.map_err(|e| {
			tracing::debug!(method = method, error = %e, "Contract read failed");
			ContractError::from(e)
		})
	}

	/// Builds the payable mint request shared by dry run, estimate and send.
	fn mint_request(&self, call: &MintCall) -> TransactionRequest {
		let data = IMintCollection::mintCall {
			quantity: U256::from(call.quantity),
		}
		.abi_encode();

		let request = TransactionRequest::default()
			.from(call.from)
			.to(self.address)
			.value(call.value)
			.input(data.into());

		match call.gas_limit {
			Some(gas) => request.gas_limit(gas),
			None => request,
		}
	}
}

fn decode_error(method: &str, err: alloy_sol_types::Error) -> ContractError {
	ContractError::Decode {
		method: method.to_string(),
		reason: err.to_string(),
	}
}

#[async_trait]
impl MintContractInterface for AlloyMintContract {
	async fn total_supply(&self) -> Result<U256, ContractError> {
		let raw = self
			.read("totalSupply", IMintCollection::totalSupplyCall {}.abi_encode())
			.await?;
		IMintCollection::totalSupplyCall::abi_decode_returns(&raw)
			.map_err(|e| decode_error("totalSupply", e))
	}

	async fn max_supply(&self) -> Result<U256, ContractError> {
		let raw = self
			.read("MAX_SUPPLY", IMintCollection::MAX_SUPPLYCall {}.abi_encode())
			.await?;
		IMintCollection::MAX_SUPPLYCall::abi_decode_returns(&raw)
			.map_err(|e| decode_error("MAX_SUPPLY", e))
	}

	async fn mint_price(&self) -> Result<U256, ContractError> {
		let raw = self
			.read("MINT_PRICE", IMintCollection::MINT_PRICECall {}.abi_encode())
			.await?;
		IMintCollection::MINT_PRICECall::abi_decode_returns(&raw)
			.map_err(|e| decode_error("MINT_PRICE", e))
	}

	async fn max_per_wallet(&self) -> Result<U256, ContractError> {
		let raw = self
			.read(
				"MAX_PER_WALLET",
				IMintCollection::MAX_PER_WALLETCall {}.abi_encode(),
			)
			.await?;
		IMintCollection::MAX_PER_WALLETCall::abi_decode_returns(&raw)
			.map_err(|e| decode_error("MAX_PER_WALLET", e))
	}

	async fn minted_count(&self, account: Address) -> Result<U256, ContractError> {
		let raw = self
			.read(
				"mintedCount",
				IMintCollection::mintedCountCall { account }.abi_encode(),
			)
			.await?;
		IMintCollection::mintedCountCall::abi_decode_returns(&raw)
			.map_err(|e| decode_error("mintedCount", e))
	}

	async fn balance_of(&self, account: Address) -> Result<U256, ContractError> {
		let raw = self
			.read(
				"balanceOf",
				IMintCollection::balanceOfCall { owner: account }.abi_encode(),
			)
			.await?;
		IMintCollection::balanceOfCall::abi_decode_returns(&raw)
			.map_err(|e| decode_error("balanceOf", e))
	}

	async fn simulate_mint(&self, call: MintCall) -> Result<(), ContractError> {
		let provider = self.provider().await?;
		provider.call(self.mint_request(&call)).await?;
		Ok(())
	}

	async fn estimate_mint_gas(&self, call: MintCall) -> Result<u64, ContractError> {
		let provider = self.provider().await?;
		Ok(provider.estimate_gas(self.mint_request(&call)).await?)
	}

	async fn send_mint(&self, call: MintCall) -> Result<TxHash, ContractError> {
		let provider = self.provider().await?;
		let request = self.mint_request(&call);

		tracing::debug!(
			to = %self.address,
			from = %call.from,
			value = %call.value,
			quantity = call.quantity,
			gas_limit = ?call.gas_limit,
			"Sending mint transaction"
		);

		let pending = provider.send_transaction(request).await?;
		Ok(*pending.tx_hash())
	}

	async fn wait_for_receipt(
		&self,
		tx_hash: TxHash,
		confirmations: u64,
		timeout: Duration,
	) -> Result<ConfirmedTx, ContractError> {
		let provider = self.provider().await?;
		let confirmation_error = |reason: String| ContractError::Confirmation { tx_hash, reason };

		tracing::info!(
			tx_hash = %tx_hash,
			confirmations = confirmations,
			timeout_seconds = timeout.as_secs(),
			"Waiting for confirmation"
		);

		let config = PendingTransactionConfig::new(tx_hash)
			.with_required_confirmations(confirmations)
			.with_timeout(Some(timeout));

		let pending = provider
			.watch_pending_transaction(config)
			.await
			.map_err(|e| match e {
				PendingTransactionError::FailedToRegister => {
					confirmation_error("Failed to register transaction watcher".to_string())
				},
				other => confirmation_error(other.to_string()),
			})?;

		let confirmed_hash = pending
			.await
			.map_err(|e| confirmation_error(e.to_string()))?;

		let receipt = provider
			.get_transaction_receipt(confirmed_hash)
			.await?
			.ok_or_else(|| confirmation_error("Receipt not available".to_string()))?;

		Ok(ConfirmedTx {
			tx_hash: receipt.transaction_hash,
			block_number: receipt.block_number,
			success: receipt.status(),
		})
	}
}
