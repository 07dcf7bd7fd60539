//! Recognition of well-known wallet and RPC failure signatures.
//!
//! Wallets and RPC nodes report the same conditions with different codes
//! and wording. These helpers centralise the matching so every caller
//! agrees on what counts as a rate limit, an unknown chain, a user
//! rejection or a simulation limitation of the tooling.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// EIP-1193 code for a request the user rejected.
pub const USER_REJECTED_CODE: i64 = 4001;
/// Code wallets return from `wallet_switchEthereumChain` for a chain they do not know.
pub const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;
/// HTTP status used by RPC gateways when throttling.
pub const HTTP_TOO_MANY_REQUESTS: i64 = 429;
/// JSON-RPC "limit exceeded" code (EIP-1474).
pub const LIMIT_EXCEEDED_CODE: i64 = -32005;

/// Compiles a constant pattern; `None` only if the pattern itself is malformed.
fn case_insensitive(pattern: &str) -> Option<Regex> {
	RegexBuilder::new(pattern).case_insensitive(true).build().ok()
}

fn pattern_matches(pattern: &Lazy<Option<Regex>>, message: &str) -> bool {
	pattern
		.as_ref()
		.is_some_and(|regex| regex.is_match(message))
}

static RATE_LIMIT: Lazy<Option<Regex>> = Lazy::new(|| {
	case_insensitive(r"rate[ _-]?limit|too many requests|request limit|exceeded the quota")
});

static BENIGN_SIMULATION: Lazy<Option<Regex>> = Lazy::new(|| {
	case_insensitive(r"cannot simulate|call[ _]exception|estimate[ _]?gas")
});

static UNRECOGNIZED_CHAIN: Lazy<Option<Regex>> =
	Lazy::new(|| case_insensitive(r"unrecognized chain|unknown chain|chain .*not (been )?added"));

static USER_REJECTED: Lazy<Option<Regex>> =
	Lazy::new(|| case_insensitive(r"user rejected|user denied|rejected by user"));

/// Returns true when an RPC failure is the node throttling us.
pub fn is_rate_limited(code: Option<i64>, message: &str) -> bool {
	matches!(code, Some(HTTP_TOO_MANY_REQUESTS) | Some(LIMIT_EXCEEDED_CODE))
		|| pattern_matches(&RATE_LIMIT, message)
}

/// Returns true when a dry run failed because the tooling cannot simulate
/// the call rather than because the call itself is invalid.
pub fn is_benign_simulation_failure(message: &str) -> bool {
	pattern_matches(&BENIGN_SIMULATION, message)
}

/// Returns true when the wallet does not know the requested chain.
pub fn is_unrecognized_chain(code: Option<i64>, message: &str) -> bool {
	code == Some(UNRECOGNIZED_CHAIN_CODE) || pattern_matches(&UNRECOGNIZED_CHAIN, message)
}

/// Returns true when the user declined the request in the wallet.
pub fn is_user_rejected(code: Option<i64>, message: &str) -> bool {
	code == Some(USER_REJECTED_CODE) || pattern_matches(&USER_REJECTED, message)
}
