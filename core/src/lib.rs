//! commission-core: sales commission aggregation and tiered payout
//! evaluation.
//!
//! The pipeline runs in a fixed order over one accounting period:
//! expense linking, per-representative aggregation, manager rollup.
//! Every stage is a pure function; [`engine::PayoutEngine`] wires them
//! to the configuration and the SQLite store.

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod linker;
pub mod resolver;
pub mod rollup;
pub mod snapshot;
pub mod store;
pub mod tier;
pub mod types;
