//! Derives the signed cash flow stream an XIRR run consumes.
//!
//! Buys and contributions are money leaving the investor's pocket, so they
//! enter negative; sells come back positive. Interest credits are internal
//! growth of a balance the investor never touched, so they are excluded and
//! show up through the terminal valuation instead. The terminal flow is the
//! current portfolio value dated "today".

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::ledger::{Transaction, TransactionKind};

use super::performance_model::CashFlow;

/// Builds a chronologically sorted flow stream from the given transactions
/// plus a terminal valuation flow.
///
/// Transactions that fail shape validation are propagated as errors here;
/// flow building runs after holdings aggregation, which has already excluded
/// broken instruments, so the caller is expected to pass a clean stream.
pub fn build_flows(
    transactions: &[Transaction],
    terminal_value: Decimal,
    as_of: NaiveDate,
) -> Result<Vec<CashFlow>> {
    let mut flows = Vec::with_capacity(transactions.len() + 1);
    for tx in transactions {
        match tx.kind()? {
            TransactionKind::Buy {
                quantity,
                unit_price,
            } => flows.push(CashFlow::new(tx.transaction_date, -(quantity * unit_price))),
            TransactionKind::Sell {
                quantity,
                unit_price,
            } => flows.push(CashFlow::new(tx.transaction_date, quantity * unit_price)),
            TransactionKind::Contribution { amount } => {
                flows.push(CashFlow::new(tx.transaction_date, -amount))
            }
            TransactionKind::Interest { .. } => {}
        }
    }
    if !terminal_value.is_zero() {
        flows.push(CashFlow::new(as_of, terminal_value));
    }
    flows.sort_by_key(|f| f.date);
    Ok(flows)
}
