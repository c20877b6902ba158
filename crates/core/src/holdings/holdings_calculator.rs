//! Ledger replay: rebuilds per-instrument positions from the transaction
//! stream using weighted-average cost.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use log::warn;
use rust_decimal::Decimal;

use crate::constants::QUANTITY_THRESHOLD;
use crate::errors::{DataIntegrityError, Error};
use crate::ledger::{sort_for_replay, Transaction, TransactionKind};

/// Accumulated state of one instrument during replay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionState {
    /// Units currently held. Only trades move this.
    pub quantity: Decimal,
    /// Cost basis of the held units (reduced at average cost on sells).
    pub cost_basis: Decimal,
    /// Contributions and credited interest, tracked without a
    /// quantity/price split.
    pub balance: Decimal,
    /// Cumulative realized gain: sale proceeds minus cost removed.
    pub realized_gain: Decimal,
}

impl PositionState {
    /// Weighted-average cost per unit of the held quantity.
    pub fn average_cost(&self) -> Decimal {
        if self.quantity.is_zero() {
            Decimal::ZERO
        } else {
            self.cost_basis / self.quantity
        }
    }

    /// Whether the residual quantity is a rounding remnant of a full exit.
    pub fn is_liquidated(&self) -> bool {
        let threshold = Decimal::from_str(QUANTITY_THRESHOLD).unwrap_or(Decimal::ZERO);
        self.quantity.abs() < threshold
    }
}

/// Outcome of replaying the full ledger: surviving per-instrument states
/// plus the errors that excluded instruments from the result.
#[derive(Debug, Default)]
pub struct ReplayOutcome {
    pub states: HashMap<String, PositionState>,
    pub issues: Vec<Error>,
}

/// Replays the ledger into per-instrument states.
///
/// An invariant violation (oversell, malformed transaction) excludes only
/// the offending instrument; its error is recorded in `issues` and every
/// other instrument aggregates normally.
pub fn replay_transactions(mut transactions: Vec<Transaction>) -> ReplayOutcome {
    sort_for_replay(&mut transactions);

    let mut states: HashMap<String, PositionState> = HashMap::new();
    let mut poisoned: HashSet<String> = HashSet::new();
    let mut issues = Vec::new();

    for tx in &transactions {
        if poisoned.contains(&tx.instrument_id) {
            continue;
        }

        let kind = match tx.kind() {
            Ok(kind) => kind,
            Err(err) => {
                warn!(
                    "Excluding instrument {} from holdings: transaction {} failed validation: {}",
                    tx.instrument_id, tx.id, err
                );
                poisoned.insert(tx.instrument_id.clone());
                states.remove(&tx.instrument_id);
                issues.push(err);
                continue;
            }
        };

        let state = states.entry(tx.instrument_id.clone()).or_default();
        match kind {
            TransactionKind::Buy {
                quantity,
                unit_price,
            } => {
                state.quantity += quantity;
                state.cost_basis += quantity * unit_price;
            }
            TransactionKind::Sell {
                quantity,
                unit_price,
            } => {
                if quantity > state.quantity {
                    let err = DataIntegrityError::Oversell {
                        instrument_id: tx.instrument_id.clone(),
                        held: state.quantity,
                        requested: quantity,
                        date: tx.transaction_date,
                    };
                    warn!("Excluding instrument {} from holdings: {}", tx.instrument_id, err);
                    poisoned.insert(tx.instrument_id.clone());
                    states.remove(&tx.instrument_id);
                    issues.push(err.into());
                    continue;
                }
                let cost_removed = quantity * state.average_cost();
                state.realized_gain += quantity * unit_price - cost_removed;
                state.cost_basis -= cost_removed;
                state.quantity -= quantity;
            }
            TransactionKind::Contribution { amount } | TransactionKind::Interest { amount } => {
                state.balance += amount;
            }
        }
    }

    ReplayOutcome { states, issues }
}
