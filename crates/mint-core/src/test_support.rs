//! Mock setups shared by the component tests.

use alloy_primitives::U256;
use mint_types::ChainSnapshot;
use mint_wallet::MockMintContractInterface;

/// Answers every collection read with the fields of `snapshot`.
pub(crate) fn expect_collection(mock: &mut MockMintContractInterface, snapshot: ChainSnapshot) {
	let total_supply = U256::from(snapshot.total_supply);
	let max_supply = U256::from(snapshot.max_supply);
	let price = snapshot.unit_price_wei;
	let max_per_wallet = U256::from(snapshot.max_per_wallet);

	mock.expect_total_supply()
		.returning(move || Box::pin(async move { Ok(total_supply) }));
	mock.expect_max_supply()
		.returning(move || Box::pin(async move { Ok(max_supply) }));
	mock.expect_mint_price()
		.returning(move || Box::pin(async move { Ok(price) }));
	mock.expect_max_per_wallet()
		.returning(move || Box::pin(async move { Ok(max_per_wallet) }));
}

/// Answers every `mintedCount` read with `count`.
pub(crate) fn expect_minted_count(mock: &mut MockMintContractInterface, count: u64) {
	mock.expect_minted_count()
		.returning(move |_| Box::pin(async move { Ok(U256::from(count)) }));
}
