//! Shared domain types for PRSense: the error taxonomy, the configuration
//! tree, plan tiers, billing-period keys, and the persisted usage record.
//!
//! Everything here is pure data and pure functions, with no I/O. The store,
//! ledger, and API clients in the sibling crates all build on these types.

pub mod config;
pub mod error;
pub mod period;
pub mod plan;
pub mod usage;
