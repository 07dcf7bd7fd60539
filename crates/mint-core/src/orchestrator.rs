//! Mint orchestrator.
//!
//! Drives one mint through `Validating → Simulating → Submitting →
//! Confirming → Settled`, or into `Failed` from any of them. Validation
//! runs against the last snapshot the reader applied and never touches the
//! network. Rate-limited submissions are retried with exponential backoff
//! and the same parameters; nothing else is retried.
//!
//! Only one mint runs at a time. A second request while one is in flight is
//! rejected immediately instead of queued.

use crate::reader::ChainReader;
use crate::state::StateHandle;
use crate::MintError;
use alloy_primitives::{Address, TxHash, U256};
use mint_config::Config;
use mint_types::{explorer_tx_url, MintPhase, MintReceipt};
use mint_wallet::{ConfirmedTx, ContractError, MintCall, MintContractInterface};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::instrument;

/// Status shown when the node cannot dry-run the mint and it is sent anyway.
pub const SIMULATION_ADVISORY: &str =
	"Simulation is not supported on this network, submitting the transaction anyway";

/// Retry and confirmation settings of the orchestrator.
#[derive(Debug, Clone)]
pub struct MintSettings {
	/// Total submission attempts when the RPC rate-limits us.
	pub max_attempts: u32,
	/// Delay before the first retry; doubled for every further one.
	pub base_backoff: Duration,
	pub confirmations: u64,
	pub confirmation_timeout: Duration,
	/// Explorer base URL used for receipt links.
	pub explorer_url: Option<String>,
}

impl Default for MintSettings {
	fn default() -> Self {
		Self {
			max_attempts: 3,
			base_backoff: Duration::from_millis(500),
			confirmations: 1,
			confirmation_timeout: Duration::from_secs(120),
			explorer_url: None,
		}
	}
}

impl From<&Config> for MintSettings {
	fn from(config: &Config) -> Self {
		Self {
			max_attempts: config.mint.max_attempts,
			base_backoff: Duration::from_millis(config.mint.base_backoff_ms),
			confirmations: config.mint.confirmations,
			confirmation_timeout: Duration::from_secs(config.mint.confirmation_timeout_seconds),
			explorer_url: config.network.explorer_url.clone(),
		}
	}
}

/// Delay before retry number `attempt + 1`: `base × 2^attempt`.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
	base.saturating_mul(2u32.checked_pow(attempt).unwrap_or(u32::MAX))
}

pub struct MintOrchestrator {
	contract: Option<Arc<dyn MintContractInterface>>,
	reader: Arc<ChainReader>,
	state: StateHandle,
	settings: MintSettings,
	in_flight: Mutex<()>,
}

impl MintOrchestrator {
	pub fn new(
		contract: Option<Arc<dyn MintContractInterface>>,
		reader: Arc<ChainReader>,
		state: StateHandle,
		settings: MintSettings,
	) -> Self {
		Self {
			contract,
			reader,
			state,
			settings,
			in_flight: Mutex::new(()),
		}
	}

	/// Mints `quantity` tokens for the connected account.
	///
	/// Returns once the transaction is confirmed and the post-mint refresh
	/// has been applied, so the shared state already reflects the mint.
	#[instrument(skip_all, fields(quantity = quantity))]
	pub async fn mint(&self, quantity: u64) -> Result<MintReceipt, MintError> {
		let Ok(_guard) = self.in_flight.try_lock() else {
			tracing::warn!("Mint requested while another one is in flight");
			return Err(MintError::MintInProgress);
		};

		self.state.set_mint_in_progress(true).await;
		let result = self.run(quantity).await;
		if let Err(e) = &result {
			self.record_failure(e).await;
		}
		self.state.set_mint_in_progress(false).await;
		result
	}

	async fn run(&self, quantity: u64) -> Result<MintReceipt, MintError> {
		self.state.set_phase(MintPhase::Validating).await;
		let contract = self.contract.as_deref().ok_or(MintError::NotConfigured)?;
		let (from, value) = self.validate(quantity).await?;

		tracing::info!(account = %from, value_wei = %value, "Mint validated");
		let mut call = MintCall {
			from,
			quantity,
			value,
			gas_limit: None,
		};

		self.simulate(contract, &mut call).await?;
		let tx_hash = self.submit(contract, &call).await?;
		let confirmed = self.confirm(contract, tx_hash).await?;
		Ok(self.settle(&call, confirmed).await)
	}

	/// Checks the request against the last applied state; no I/O.
	async fn validate(&self, quantity: u64) -> Result<(Address, U256), MintError> {
		let state = self.state.read().await;
		let from = state.account.address.ok_or(MintError::NoWallet)?;
		let snapshot = state
			.snapshot
			.as_ref()
			.ok_or(MintError::SnapshotUnavailable)?;

		let remaining_allowance = state.account.remaining_allowance(snapshot.max_per_wallet);
		if remaining_allowance == 0 {
			return Err(MintError::AllowanceExhausted);
		}
		let remaining_supply = snapshot.remaining_supply();
		if remaining_supply == 0 {
			return Err(MintError::SupplyExhausted);
		}

		let max = remaining_allowance.min(remaining_supply);
		if quantity == 0 || quantity > max {
			return Err(MintError::InvalidQuantity {
				requested: quantity,
				max,
			});
		}

		let value = snapshot
			.total_price(quantity)
			.ok_or(MintError::PriceOverflow)?;
		Ok((from, value))
	}

	/// Dry-runs the mint and records the gas estimate on `call`.
	async fn simulate(
		&self,
		contract: &dyn MintContractInterface,
		call: &mut MintCall,
	) -> Result<(), MintError> {
		self.state.set_phase(MintPhase::Simulating).await;

		let result = async {
			contract.simulate_mint(call.clone()).await?;
			contract.estimate_mint_gas(call.clone()).await
		}
		.await;

		match result {
			Ok(gas) => {
				tracing::debug!(gas_limit = gas, "Simulation succeeded");
				call.gas_limit = Some(gas);
				Ok(())
			},
			Err(e) if e.is_benign_simulation_failure() => {
				tracing::warn!(error = %e, "Simulation unavailable, submitting anyway");
				self.state.set_status(SIMULATION_ADVISORY).await;
				Ok(())
			},
			Err(e) => Err(MintError::SimulationFailed(e.short_message())),
		}
	}

	/// Sends the mint, retrying only rate-limit rejections.
	async fn submit(
		&self,
		contract: &dyn MintContractInterface,
		call: &MintCall,
	) -> Result<TxHash, MintError> {
		let mut attempt: u32 = 0;
		loop {
			self.state.set_phase(MintPhase::Submitting { attempt }).await;

			let err = match contract.send_mint(call.clone()).await {
				Ok(tx_hash) => {
					tracing::info!(tx_hash = %tx_hash, attempt = attempt, "Mint submitted");
					return Ok(tx_hash);
				},
				Err(e) => e,
			};

			if err.is_rate_limited() && attempt + 1 < self.settings.max_attempts {
				let delay = backoff_delay(self.settings.base_backoff, attempt);
				tracing::warn!(
					attempt = attempt,
					delay_ms = delay.as_millis() as u64,
					error = %err,
					"Submission rate limited, backing off"
				);
				self.state
					.set_status(format!(
						"RPC rate limited, retrying in {} ms",
						delay.as_millis()
					))
					.await;
				tokio::time::sleep(delay).await;
				attempt += 1;
				continue;
			}

			return Err(submission_error(err, attempt + 1));
		}
	}

	async fn confirm(
		&self,
		contract: &dyn MintContractInterface,
		tx_hash: TxHash,
	) -> Result<ConfirmedTx, MintError> {
		self.state.set_last_tx(tx_hash).await;
		self.state.set_phase(MintPhase::Confirming { tx_hash }).await;
		self.state
			.set_status("Transaction submitted, waiting for confirmation...")
			.await;

		let confirmed = contract
			.wait_for_receipt(
				tx_hash,
				self.settings.confirmations,
				self.settings.confirmation_timeout,
			)
			.await
			.map_err(|e| match e {
				ContractError::TxReverted(hash) => MintError::Reverted(hash),
				other => MintError::ConfirmationFailed(other.short_message()),
			})?;

		if !confirmed.success {
			return Err(MintError::Reverted(tx_hash));
		}
		Ok(confirmed)
	}

	async fn settle(&self, call: &MintCall, confirmed: ConfirmedTx) -> MintReceipt {
		let tx_hash = confirmed.tx_hash;
		tracing::info!(
			tx_hash = %tx_hash,
			block_number = ?confirmed.block_number,
			quantity = call.quantity,
			"Mint confirmed"
		);

		self.state.set_phase(MintPhase::Settled { tx_hash }).await;
		self.state
			.set_status(format!(
				"Successfully minted {} NFT{}!",
				call.quantity,
				if call.quantity == 1 { "" } else { "s" }
			))
			.await;

		self.reader.refresh().await;

		MintReceipt {
			tx_hash,
			quantity: call.quantity,
			total_price: call.value,
			block_number: confirmed.block_number,
			explorer_url: self
				.settings
				.explorer_url
				.as_deref()
				.map(|base| explorer_tx_url(base, &tx_hash)),
		}
	}

	async fn record_failure(&self, err: &MintError) {
		if err.is_client_side() {
			tracing::info!(reason = %err, "Mint blocked");
		} else {
			tracing::warn!(reason = %err, "Mint failed");
		}

		let message = err.status_message();
		self.state.set_status(message.clone()).await;
		self.state
			.set_phase(MintPhase::Failed { reason: message })
			.await;
	}
}

fn submission_error(err: ContractError, attempts: u32) -> MintError {
	if err.is_rate_limited() {
		MintError::RateLimited {
			attempts,
			message: err.short_message(),
		}
	} else if err.is_user_rejected() {
		MintError::UserRejected
	} else {
		MintError::SubmissionFailed(err.short_message())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::event_bus::EventBus;
	use crate::test_support::{expect_collection, expect_minted_count};
	use mint_types::utils::tests::builders::snapshot::ONE_TOKEN;
	use mint_types::utils::tests::builders::ChainSnapshotBuilder;
	use mint_types::{AccountState, ChainSnapshot, MintEvent};
	use mint_wallet::MockMintContractInterface;
	use tokio::sync::{broadcast, Notify};

	const ACCOUNT: Address = Address::new([0x11; 20]);
	const TX_HASH: TxHash = TxHash::new([0xab; 32]);

	struct Harness {
		orchestrator: Arc<MintOrchestrator>,
		state: StateHandle,
		events: broadcast::Receiver<MintEvent>,
	}

	fn scenario_snapshot() -> ChainSnapshot {
		ChainSnapshotBuilder::new()
			.total_supply(0)
			.max_supply(500)
			.unit_price_wei(U256::from(ONE_TOKEN))
			.max_per_wallet(2)
			.build()
	}

	async fn harness(
		contract: MockMintContractInterface,
		snapshot: ChainSnapshot,
		minted_count: u64,
	) -> Harness {
		let state = StateHandle::new(EventBus::new(128));
		let events = state.events().subscribe();
		let contract: Arc<dyn MintContractInterface> = Arc::new(contract);
		let reader = Arc::new(ChainReader::new(Some(contract.clone()), state.clone()));
		let settings = MintSettings {
			explorer_url: Some("https://explorer.local".into()),
			..Default::default()
		};
		let orchestrator = Arc::new(MintOrchestrator::new(
			Some(contract),
			reader,
			state.clone(),
			settings,
		));

		state
			.seed(
				snapshot,
				AccountState {
					address: Some(ACCOUNT),
					minted_count,
				},
			)
			.await;

		Harness {
			orchestrator,
			state,
			events,
		}
	}

	fn expect_confirmation(mock: &mut MockMintContractInterface, success: bool) {
		mock.expect_wait_for_receipt()
			.times(1)
			.returning(move |tx_hash, _, _| {
				Box::pin(async move {
					Ok(ConfirmedTx {
						tx_hash,
						block_number: Some(42),
						success,
					})
				})
			});
	}

	fn expect_successful_simulation(mock: &mut MockMintContractInterface) {
		mock.expect_simulate_mint()
			.times(1)
			.returning(|_| Box::pin(async { Ok(()) }));
		mock.expect_estimate_mint_gas()
			.times(1)
			.returning(|_| Box::pin(async { Ok(150_000) }));
	}

	fn rate_limited() -> ContractError {
		ContractError::Rpc {
			code: 429,
			message: "Too Many Requests".into(),
		}
	}

	fn phases(events: &mut broadcast::Receiver<MintEvent>) -> Vec<MintPhase> {
		let mut phases = Vec::new();
		while let Ok(event) = events.try_recv() {
			if let MintEvent::PhaseChanged(phase) = event {
				phases.push(phase);
			}
		}
		phases
	}

	#[tokio::test]
	async fn test_invalid_quantity_makes_no_network_calls() {
		for quantity in [0, 3, 50] {
			let h = harness(MockMintContractInterface::new(), scenario_snapshot(), 0).await;
			let result = h.orchestrator.mint(quantity).await;

			assert_eq!(
				result,
				Err(MintError::InvalidQuantity {
					requested: quantity,
					max: 2,
				})
			);
			let state = h.state.snapshot().await;
			assert!(matches!(state.phase, MintPhase::Failed { .. }));
			assert!(!state.mint_in_progress);
		}
	}

	#[tokio::test]
	async fn test_quantity_bounded_by_remaining_supply() {
		let snapshot = ChainSnapshotBuilder::new()
			.total_supply(499)
			.max_supply(500)
			.max_per_wallet(2)
			.build();
		let h = harness(MockMintContractInterface::new(), snapshot, 0).await;

		assert_eq!(
			h.orchestrator.mint(2).await,
			Err(MintError::InvalidQuantity {
				requested: 2,
				max: 1,
			})
		);
	}

	#[tokio::test]
	async fn test_blocked_requests() {
		let h = harness(MockMintContractInterface::new(), scenario_snapshot(), 2).await;
		assert_eq!(
			h.orchestrator.mint(1).await,
			Err(MintError::AllowanceExhausted)
		);
		assert_eq!(
			h.state.read().await.status,
			"Wallet has reached its mint allowance"
		);

		let sold_out = ChainSnapshotBuilder::new()
			.total_supply(500)
			.max_supply(500)
			.build();
		let h = harness(MockMintContractInterface::new(), sold_out, 0).await;
		assert_eq!(h.orchestrator.mint(1).await, Err(MintError::SupplyExhausted));

		let h = harness(MockMintContractInterface::new(), scenario_snapshot(), 0).await;
		h.state.set_account(None).await;
		assert_eq!(h.orchestrator.mint(1).await, Err(MintError::NoWallet));
	}

	#[tokio::test]
	async fn test_price_overflow_is_blocked() {
		let snapshot = ChainSnapshotBuilder::new()
			.unit_price_wei(U256::MAX)
			.max_per_wallet(2)
			.build();
		let h = harness(MockMintContractInterface::new(), snapshot, 0).await;
		assert_eq!(h.orchestrator.mint(2).await, Err(MintError::PriceOverflow));
	}

	#[tokio::test]
	async fn test_unconfigured_contract() {
		let state = StateHandle::new(EventBus::new(8));
		let reader = Arc::new(ChainReader::new(None, state.clone()));
		let orchestrator = MintOrchestrator::new(None, reader, state.clone(), MintSettings::default());

		assert_eq!(orchestrator.mint(1).await, Err(MintError::NotConfigured));
		assert_eq!(
			state.read().await.status,
			"Contract address is not configured"
		);
	}

	#[tokio::test]
	async fn test_mint_settles_then_allowance_is_exhausted() {
		let mut mock = MockMintContractInterface::new();
		expect_successful_simulation(&mut mock);
		mock.expect_send_mint()
			.withf(|call| {
				call.from == ACCOUNT
					&& call.quantity == 2
					&& call.value == U256::from(2 * ONE_TOKEN)
					&& call.gas_limit == Some(150_000)
			})
			.times(1)
			.returning(|_| Box::pin(async { Ok(TX_HASH) }));
		expect_confirmation(&mut mock, true);
		expect_collection(
			&mut mock,
			ChainSnapshotBuilder::new()
				.total_supply(2)
				.max_supply(500)
				.max_per_wallet(2)
				.build(),
		);
		expect_minted_count(&mut mock, 2);

		let mut h = harness(mock, scenario_snapshot(), 0).await;
		let receipt = h.orchestrator.mint(2).await.unwrap();

		assert_eq!(receipt.tx_hash, TX_HASH);
		assert_eq!(receipt.quantity, 2);
		assert_eq!(receipt.total_price, U256::from(2 * ONE_TOKEN));
		assert_eq!(receipt.block_number, Some(42));
		assert_eq!(
			receipt.explorer_url,
			Some(format!("https://explorer.local/tx/{}", TX_HASH))
		);

		let state = h.state.snapshot().await;
		assert_eq!(state.account.minted_count, 2);
		assert_eq!(state.snapshot.as_ref().map(|s| s.total_supply), Some(2));
		assert_eq!(state.status, "Successfully minted 2 NFTs!");
		assert_eq!(state.last_tx_hash, Some(TX_HASH));
		assert!(!state.mint_in_progress);

		assert_eq!(
			phases(&mut h.events),
			vec![
				MintPhase::Validating,
				MintPhase::Simulating,
				MintPhase::Submitting { attempt: 0 },
				MintPhase::Confirming { tx_hash: TX_HASH },
				MintPhase::Settled { tx_hash: TX_HASH },
			]
		);

		assert_eq!(
			h.orchestrator.mint(1).await,
			Err(MintError::AllowanceExhausted)
		);
	}

	#[tokio::test]
	async fn test_benign_simulation_failure_still_submits() {
		let mut mock = MockMintContractInterface::new();
		mock.expect_simulate_mint().times(1).returning(|_| {
			Box::pin(async {
				Err(ContractError::Rpc {
					code: -32603,
					message: "missing revert data (CALL_EXCEPTION)".into(),
				})
			})
		});
		mock.expect_estimate_mint_gas().never();
		mock.expect_send_mint()
			.withf(|call| call.gas_limit.is_none())
			.times(1)
			.returning(|_| Box::pin(async { Ok(TX_HASH) }));
		expect_confirmation(&mut mock, true);
		expect_collection(&mut mock, scenario_snapshot());
		expect_minted_count(&mut mock, 1);

		let mut h = harness(mock, scenario_snapshot(), 0).await;
		assert!(h.orchestrator.mint(1).await.is_ok());

		let mut statuses = Vec::new();
		while let Ok(event) = h.events.try_recv() {
			if let MintEvent::StatusChanged(status) = event {
				statuses.push(status);
			}
		}
		assert_eq!(statuses.first().map(String::as_str), Some(SIMULATION_ADVISORY));
		assert_eq!(
			statuses.last().map(String::as_str),
			Some("Successfully minted 1 NFT!")
		);
	}

	#[tokio::test]
	async fn test_fatal_simulation_failure_aborts() {
		let mut mock = MockMintContractInterface::new();
		mock.expect_simulate_mint().times(1).returning(|_| {
			Box::pin(async { Err(ContractError::Reverted("Exceeds wallet limit".into())) })
		});
		mock.expect_send_mint().never();

		let h = harness(mock, scenario_snapshot(), 0).await;
		assert_eq!(
			h.orchestrator.mint(1).await,
			Err(MintError::SimulationFailed("Exceeds wallet limit".into()))
		);

		let state = h.state.snapshot().await;
		assert_eq!(state.status, "Exceeds wallet limit");
		assert_eq!(
			state.phase,
			MintPhase::Failed {
				reason: "Exceeds wallet limit".into()
			}
		);
	}

	#[tokio::test(start_paused = true)]
	async fn test_rate_limit_gives_up_after_three_attempts() {
		let mut mock = MockMintContractInterface::new();
		expect_successful_simulation(&mut mock);
		mock.expect_send_mint()
			.times(3)
			.returning(|_| Box::pin(async { Err(rate_limited()) }));
		mock.expect_wait_for_receipt().never();

		let mut h = harness(mock, scenario_snapshot(), 0).await;
		let started = tokio::time::Instant::now();
		let result = h.orchestrator.mint(1).await;

		assert_eq!(
			result,
			Err(MintError::RateLimited {
				attempts: 3,
				message: "Too Many Requests".into(),
			})
		);
		// 500 ms + 1000 ms; a third wait would add 2000 ms.
		assert_eq!(started.elapsed(), Duration::from_millis(1500));

		let submitting: Vec<_> = phases(&mut h.events)
			.into_iter()
			.filter(|phase| matches!(phase, MintPhase::Submitting { .. }))
			.collect();
		assert_eq!(
			submitting,
			vec![
				MintPhase::Submitting { attempt: 0 },
				MintPhase::Submitting { attempt: 1 },
				MintPhase::Submitting { attempt: 2 },
			]
		);
	}

	#[tokio::test(start_paused = true)]
	async fn test_rate_limit_recovers_without_resimulating() {
		let mut mock = MockMintContractInterface::new();
		expect_successful_simulation(&mut mock);
		let mut sends = 0;
		mock.expect_send_mint().times(2).returning(move |_| {
			sends += 1;
			let first = sends == 1;
			Box::pin(async move {
				if first {
					Err(rate_limited())
				} else {
					Ok(TX_HASH)
				}
			})
		});
		expect_confirmation(&mut mock, true);
		expect_collection(&mut mock, scenario_snapshot());
		expect_minted_count(&mut mock, 1);

		let h = harness(mock, scenario_snapshot(), 0).await;
		let started = tokio::time::Instant::now();

		assert!(h.orchestrator.mint(1).await.is_ok());
		assert_eq!(started.elapsed(), Duration::from_millis(500));
	}

	#[tokio::test]
	async fn test_other_submission_errors_are_not_retried() {
		let mut mock = MockMintContractInterface::new();
		expect_successful_simulation(&mut mock);
		mock.expect_send_mint().times(1).returning(|_| {
			Box::pin(async {
				Err(ContractError::Rpc {
					code: -32000,
					message: "insufficient funds for gas * price + value".into(),
				})
			})
		});

		let h = harness(mock, scenario_snapshot(), 0).await;
		assert_eq!(
			h.orchestrator.mint(1).await,
			Err(MintError::SubmissionFailed(
				"insufficient funds for gas * price + value".into()
			))
		);
		assert_eq!(
			h.state.read().await.status,
			"insufficient funds for gas * price + value"
		);
	}

	#[tokio::test(start_paused = true)]
	async fn test_number_429_in_message_is_not_retried() {
		let mut mock = MockMintContractInterface::new();
		expect_successful_simulation(&mut mock);
		mock.expect_send_mint().times(1).returning(|_| {
			Box::pin(async {
				Err(ContractError::Rpc {
					code: -32000,
					message: "nonce too low: next nonce 429, tx nonce 12".into(),
				})
			})
		});

		let h = harness(mock, scenario_snapshot(), 0).await;
		let started = tokio::time::Instant::now();

		assert_eq!(
			h.orchestrator.mint(1).await,
			Err(MintError::SubmissionFailed(
				"nonce too low: next nonce 429, tx nonce 12".into()
			))
		);
		assert_eq!(started.elapsed(), Duration::ZERO);
	}

	#[tokio::test]
	async fn test_user_rejection_is_not_retried() {
		let mut mock = MockMintContractInterface::new();
		expect_successful_simulation(&mut mock);
		mock.expect_send_mint().times(1).returning(|_| {
			Box::pin(async {
				Err(ContractError::Rpc {
					code: 4001,
					message: "User denied transaction signature".into(),
				})
			})
		});

		let h = harness(mock, scenario_snapshot(), 0).await;
		assert_eq!(h.orchestrator.mint(1).await, Err(MintError::UserRejected));
	}

	#[tokio::test]
	async fn test_reverted_receipt_fails_without_refresh() {
		let mut mock = MockMintContractInterface::new();
		expect_successful_simulation(&mut mock);
		mock.expect_send_mint()
			.times(1)
			.returning(|_| Box::pin(async { Ok(TX_HASH) }));
		expect_confirmation(&mut mock, false);
		mock.expect_total_supply().never();

		let h = harness(mock, scenario_snapshot(), 0).await;
		assert_eq!(h.orchestrator.mint(1).await, Err(MintError::Reverted(TX_HASH)));
		assert_eq!(h.state.read().await.last_tx_hash, Some(TX_HASH));
	}

	#[tokio::test]
	async fn test_concurrent_mint_is_rejected() {
		let sent = Arc::new(Notify::new());
		let release = Arc::new(Notify::new());

		let mut mock = MockMintContractInterface::new();
		expect_successful_simulation(&mut mock);
		let (sent_signal, release_wait) = (sent.clone(), release.clone());
		mock.expect_send_mint().times(1).returning(move |_| {
			let sent = sent_signal.clone();
			let release = release_wait.clone();
			Box::pin(async move {
				sent.notify_one();
				release.notified().await;
				Ok(TX_HASH)
			})
		});
		expect_confirmation(&mut mock, true);
		expect_collection(&mut mock, scenario_snapshot());
		expect_minted_count(&mut mock, 1);

		let h = harness(mock, scenario_snapshot(), 0).await;
		let orchestrator = h.orchestrator.clone();
		let first = tokio::spawn(async move { orchestrator.mint(1).await });

		sent.notified().await;
		assert!(h.state.read().await.mint_in_progress);
		assert_eq!(h.orchestrator.mint(1).await, Err(MintError::MintInProgress));
		assert_eq!(
			h.state.read().await.phase,
			MintPhase::Submitting { attempt: 0 }
		);

		release.notify_one();
		assert!(first.await.unwrap().is_ok());
		assert!(!h.state.read().await.mint_in_progress);
	}

	#[test]
	fn test_backoff_doubles() {
		let base = Duration::from_millis(500);
		assert_eq!(backoff_delay(base, 0), Duration::from_millis(500));
		assert_eq!(backoff_delay(base, 1), Duration::from_millis(1000));
		assert_eq!(backoff_delay(base, 2), Duration::from_millis(2000));
		assert!(backoff_delay(base, 64) >= backoff_delay(base, 31));
	}
}
