use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    XIRR_MAX_ITERATIONS, XIRR_RATE_MAX, XIRR_RATE_MIN, XIRR_TOLERANCE,
};
use crate::errors::{Error, Result};

/// One dated, signed cash flow from the investor's point of view: money
/// invested is negative, money received (or currently held as value) is
/// positive.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: Decimal,
}

impl CashFlow {
    pub fn new(date: NaiveDate, amount: Decimal) -> Self {
        Self { date, amount }
    }
}

/// Outcome of an XIRR computation.
///
/// Failure is a first-class value here: a solver that does not converge or a
/// flow stream that has no root reports so explicitly, never a 0% rate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "outcome")]
#[serde(rename_all = "camelCase")]
pub enum XirrOutcome {
    /// Converged; `rate_pct` is the annualized money-weighted return in
    /// percent.
    #[serde(rename_all = "camelCase")]
    Rate { rate_pct: Decimal },
    /// The solver exhausted its iteration budget without |NPV| falling
    /// under tolerance.
    NonConvergent { iterations: u32 },
    /// The flow stream cannot define a rate (for example all flows have the
    /// same sign).
    Undefined { reason: String },
}

impl XirrOutcome {
    /// Converts the outcome into a hard error for callers that require a
    /// definite rate.
    pub fn into_rate(self) -> Result<Decimal> {
        match self {
            XirrOutcome::Rate { rate_pct } => Ok(rate_pct),
            XirrOutcome::NonConvergent { iterations } => {
                Err(Error::NonConvergence { iterations })
            }
            XirrOutcome::Undefined { reason } => Err(Error::InsufficientData(reason)),
        }
    }
}

/// Solver settings, read fresh on every run.
#[derive(Debug, Clone, Copy)]
pub struct XirrConfig {
    pub tolerance: f64,
    pub max_iterations: u32,
    pub rate_min: f64,
    pub rate_max: f64,
    pub initial_guess: f64,
}

impl Default for XirrConfig {
    fn default() -> Self {
        Self {
            tolerance: XIRR_TOLERANCE,
            max_iterations: XIRR_MAX_ITERATIONS,
            rate_min: XIRR_RATE_MIN,
            rate_max: XIRR_RATE_MAX,
            initial_guess: 0.1,
        }
    }
}
