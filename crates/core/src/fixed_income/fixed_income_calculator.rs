//! Compound-interest projection for fixed deposits.
//!
//! `maturity = principal x (1 + rate/n)^(n x years)` with `years = days/365`.
//! The exponentiation runs in `f64`; inputs and outputs stay `Decimal`.

use num_traits::ToPrimitive;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::constants::{DAYS_PER_YEAR, DISPLAY_DECIMAL_PRECISION};
use crate::errors::{Result, ValidationError};

use super::fixed_income_model::{FixedDepositTerms, MaturityProjection};

/// Projects the maturity value of a deposit. Zero and negative rates are
/// permitted; a maturity date on or before the start date is not.
pub fn project_maturity(terms: &FixedDepositTerms) -> Result<MaturityProjection> {
    if terms.maturity_date <= terms.start_date {
        return Err(ValidationError::InvalidDateRange {
            start: terms.start_date,
            maturity: terms.maturity_date,
        }
        .into());
    }
    if terms.principal.is_sign_negative() || terms.principal.is_zero() {
        return Err(ValidationError::InvalidInput(format!(
            "principal must be positive, got {}",
            terms.principal
        ))
        .into());
    }

    let days = (terms.maturity_date - terms.start_date).num_days();
    let years = days as f64 / DAYS_PER_YEAR;
    let periods = f64::from(terms.frequency.periods_per_year());
    let rate = terms.annual_rate_pct.to_f64().unwrap_or(0.0) / 100.0;

    let base = 1.0 + rate / periods;
    if base <= 0.0 {
        return Err(ValidationError::InvalidInput(format!(
            "rate {}% is below -100% per period",
            terms.annual_rate_pct
        ))
        .into());
    }

    let principal = terms.principal.to_f64().unwrap_or(0.0);
    let amount = principal * base.powf(periods * years);
    let maturity_amount = Decimal::from_f64(amount)
        .ok_or_else(|| ValidationError::InvalidInput("maturity amount overflowed".to_string()))?
        .round_dp(DISPLAY_DECIMAL_PRECISION);

    Ok(MaturityProjection {
        principal: terms.principal,
        maturity_amount,
        interest_earned: maturity_amount - terms.principal,
        tenor_years: Decimal::from_f64(years)
            .unwrap_or(Decimal::ZERO)
            .round_dp(4),
        frequency: terms.frequency,
    })
}
