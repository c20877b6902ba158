//! Hearthfolio Core - Portfolio analytics and rebalancing engine.
//!
//! This crate reconstructs holdings from an append-only transaction ledger
//! and computes returns, risk scores, rebalancing recommendations, and
//! price-zone alerts on top of them. It is storage-agnostic and defines the
//! `LedgerReaderTrait` that backing stores (such as the `ledger-memory`
//! crate) implement.

pub mod constants;
pub mod engine;
pub mod errors;
pub mod fixed_income;
pub mod health;
pub mod holdings;
pub mod instruments;
pub mod ledger;
pub mod performance;
pub mod rebalancing;
pub mod zones;

#[cfg(test)]
pub(crate) mod test_fixtures;

// Re-export the facade and the most used types
pub use engine::AnalyticsEngine;
pub use errors::Error;
pub use errors::Result;
pub use instruments::{AssetClass, Instrument, MarketCapTier};
pub use ledger::{LedgerReaderTrait, Transaction, TransactionType};
