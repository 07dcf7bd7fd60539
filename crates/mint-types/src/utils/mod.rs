//! Utility functions shared across the mint client.

pub mod formatting;

#[cfg(any(test, feature = "testing"))]
pub mod tests;
