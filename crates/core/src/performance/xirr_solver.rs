//! XIRR root finder.
//!
//! Finds the rate `r` where `Σ CF_i / (1 + r)^(t_i / 365) = 0`, with `t_i`
//! in days since the earliest flow. Newton-Raphson with a finite-difference
//! derivative does the fast path; bisection over the bounded rate interval
//! takes over when a step diverges or the derivative degenerates. The solver
//! runs in `f64` internally and converts back to `Decimal` at the boundary.

use log::debug;
use num_traits::ToPrimitive;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::constants::{DAYS_PER_YEAR, DISPLAY_DECIMAL_PRECISION};

use super::performance_model::{CashFlow, XirrConfig, XirrOutcome};

const DERIVATIVE_STEP: f64 = 1e-7;
const DERIVATIVE_EPSILON: f64 = 1e-12;

/// Solves for the annualized money-weighted rate of return.
pub fn solve_xirr(flows: &[CashFlow], config: &XirrConfig) -> XirrOutcome {
    let has_negative = flows.iter().any(|f| f.amount.is_sign_negative() && !f.amount.is_zero());
    let has_positive = flows.iter().any(|f| f.amount.is_sign_positive() && !f.amount.is_zero());
    if !has_negative || !has_positive {
        return XirrOutcome::Undefined {
            reason: "insufficient cash flow diversity: need at least one inflow and one outflow"
                .to_string(),
        };
    }

    let earliest = match flows.iter().map(|f| f.date).min() {
        Some(date) => date,
        None => {
            return XirrOutcome::Undefined {
                reason: "no cash flows".to_string(),
            }
        }
    };
    let samples: Vec<(f64, f64)> = flows
        .iter()
        .map(|f| {
            let years = (f.date - earliest).num_days() as f64 / DAYS_PER_YEAR;
            (years, f.amount.to_f64().unwrap_or(0.0))
        })
        .collect();
    if samples.iter().all(|(years, _)| *years == 0.0) {
        return XirrOutcome::Undefined {
            reason: "all cash flows share the same date".to_string(),
        };
    }

    let mut iterations = 0u32;
    let mut rate = config.initial_guess;

    // Newton-Raphson phase.
    while iterations < config.max_iterations {
        iterations += 1;
        let value = npv(rate, &samples);
        if value.abs() < config.tolerance {
            return rate_outcome(rate, iterations);
        }
        let derivative = (npv(rate + DERIVATIVE_STEP, &samples)
            - npv(rate - DERIVATIVE_STEP, &samples))
            / (2.0 * DERIVATIVE_STEP);
        if !derivative.is_finite() || derivative.abs() < DERIVATIVE_EPSILON {
            debug!("XIRR derivative degenerated at rate {rate}; switching to bisection");
            break;
        }
        let next = rate - value / derivative;
        if !next.is_finite() || next <= config.rate_min || next >= config.rate_max {
            debug!("XIRR Newton step to {next} left the search interval; switching to bisection");
            break;
        }
        rate = next;
    }

    // Bisection phase over the remaining iteration budget.
    let mut lo = config.rate_min;
    let mut hi = config.rate_max;
    let mut npv_lo = npv(lo, &samples);
    let npv_hi = npv(hi, &samples);
    if npv_lo.abs() < config.tolerance {
        return rate_outcome(lo, iterations);
    }
    if npv_hi.abs() < config.tolerance {
        return rate_outcome(hi, iterations);
    }
    if npv_lo * npv_hi > 0.0 {
        return XirrOutcome::NonConvergent { iterations };
    }
    while iterations < config.max_iterations {
        iterations += 1;
        let mid = (lo + hi) / 2.0;
        let value = npv(mid, &samples);
        if value.abs() < config.tolerance {
            return rate_outcome(mid, iterations);
        }
        if npv_lo * value < 0.0 {
            hi = mid;
        } else {
            lo = mid;
            npv_lo = value;
        }
    }

    XirrOutcome::NonConvergent {
        iterations: config.max_iterations,
    }
}

fn npv(rate: f64, samples: &[(f64, f64)]) -> f64 {
    let base = 1.0 + rate;
    if base <= 0.0 {
        return f64::INFINITY;
    }
    samples
        .iter()
        .map(|(years, amount)| amount / base.powf(*years))
        .sum()
}

fn rate_outcome(rate: f64, iterations: u32) -> XirrOutcome {
    match Decimal::from_f64(rate * 100.0) {
        Some(pct) => XirrOutcome::Rate {
            rate_pct: pct.round_dp(DISPLAY_DECIMAL_PRECISION),
        },
        None => XirrOutcome::NonConvergent { iterations },
    }
}
