//! Test builders for mint types
//!
//! This module provides fluent builder APIs for constructing various types
//! with sensible defaults for TESTING purposes.
pub mod builders;
