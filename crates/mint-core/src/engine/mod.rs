//! Plumbing shared by the core components.

pub mod event_bus;
