//! Builder patterns for mint types

pub mod networks;
pub mod snapshot;

pub use networks::TargetNetworkBuilder;
pub use snapshot::ChainSnapshotBuilder;
