use std::sync::Arc;

use log::{debug, warn};
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::instruments::{AssetClass, Instrument};
use crate::ledger::LedgerReaderTrait;

use super::holdings_calculator::{replay_transactions, PositionState};
use super::holdings_model::{Holding, HoldingsComputation, RealizedGain};

/// Trait for the holdings service.
pub trait HoldingsServiceTrait: Send + Sync {
    /// Rebuilds current holdings from the ledger, optionally scoped to one
    /// asset class. Re-reads the ledger on every call.
    fn compute_holdings(&self, asset_class: Option<AssetClass>) -> Result<HoldingsComputation>;
}

pub struct HoldingsService {
    ledger: Arc<dyn LedgerReaderTrait>,
}

impl HoldingsService {
    pub fn new(ledger: Arc<dyn LedgerReaderTrait>) -> Self {
        Self { ledger }
    }

    fn materialize(&self, instrument: &Instrument, state: &PositionState) -> Result<Option<Holding>> {
        if instrument.asset_class.is_market_traded() {
            if state.is_liquidated() {
                return Ok(None);
            }
            let current_price = self.ledger.get_current_price(&instrument.id)?;
            let current_value = current_price.map(|p| p * state.quantity);
            Ok(Some(Holding::Position {
                instrument_id: instrument.id.clone(),
                symbol: instrument.symbol.clone(),
                name: instrument.name.clone(),
                asset_class: instrument.asset_class,
                sector: instrument.sector.clone(),
                market_cap_tier: instrument.market_cap_tier,
                quantity: state.quantity,
                average_cost: state.average_cost(),
                invested_amount: state.cost_basis,
                realized_gain: state.realized_gain,
                current_price,
                current_value,
            }))
        } else {
            let invested = state.balance + state.cost_basis;
            if invested.is_zero() {
                return Ok(None);
            }
            // For balance-style instruments the ledger quote, when present,
            // is the current balance itself.
            let current_value = self.ledger.get_current_price(&instrument.id)?;
            Ok(Some(Holding::Balance {
                instrument_id: instrument.id.clone(),
                symbol: instrument.symbol.clone(),
                name: instrument.name.clone(),
                asset_class: instrument.asset_class,
                invested_amount: invested,
                current_value,
            }))
        }
    }
}

impl HoldingsServiceTrait for HoldingsService {
    fn compute_holdings(&self, asset_class: Option<AssetClass>) -> Result<HoldingsComputation> {
        let instruments = self.ledger.list_instruments()?;
        let transactions = self.ledger.list_transactions(None)?;
        debug!(
            "Computing holdings over {} transactions across {} instruments",
            transactions.len(),
            instruments.len()
        );

        let outcome = replay_transactions(transactions);
        let mut computation = HoldingsComputation {
            issues: outcome.issues,
            ..Default::default()
        };

        for instrument in &instruments {
            if let Some(class) = asset_class {
                if instrument.asset_class != class {
                    continue;
                }
            }
            let state = match outcome.states.get(&instrument.id) {
                Some(state) => state,
                None => continue,
            };
            if !state.realized_gain.is_zero() {
                computation.realized.push(RealizedGain {
                    instrument_id: instrument.id.clone(),
                    amount: state.realized_gain,
                });
            }
            if let Some(holding) = self.materialize(instrument, state)? {
                computation.holdings.push(holding);
            }
        }

        // Transactions referencing instruments the ledger does not describe
        // cannot be classified or valued.
        for instrument_id in outcome.states.keys() {
            if !instruments.iter().any(|i| &i.id == instrument_id) {
                warn!(
                    "Ledger has transactions for unknown instrument {}. Skipping.",
                    instrument_id
                );
            }
        }

        computation
            .holdings
            .sort_by(|a, b| a.instrument_id().cmp(b.instrument_id()));
        computation
            .realized
            .sort_by(|a, b| a.instrument_id.cmp(&b.instrument_id));
        Ok(computation)
    }
}

/// Total effective value of a set of holdings.
pub fn portfolio_value(holdings: &[Holding]) -> Decimal {
    holdings.iter().map(|h| h.effective_value()).sum()
}
