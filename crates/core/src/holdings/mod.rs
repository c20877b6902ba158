pub mod holdings_calculator;
mod holdings_model;
mod holdings_service;

pub use holdings_calculator::{replay_transactions, PositionState, ReplayOutcome};
pub use holdings_model::{Holding, HoldingsComputation, RealizedGain};
pub use holdings_service::{portfolio_value, HoldingsService, HoldingsServiceTrait};
