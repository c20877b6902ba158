use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Compounding frequency of a fixed deposit.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CompoundingFrequency {
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl CompoundingFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            CompoundingFrequency::Monthly => 12,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::SemiAnnual => 2,
            CompoundingFrequency::Annual => 1,
        }
    }

    /// Parses a frequency label. Unrecognized labels fall back to
    /// semi-annual compounding, the most common deposit convention.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "monthly" => CompoundingFrequency::Monthly,
            "quarterly" => CompoundingFrequency::Quarterly,
            "semi-annual" | "semiannual" | "half-yearly" | "half yearly" => {
                CompoundingFrequency::SemiAnnual
            }
            "annual" | "yearly" | "annually" => CompoundingFrequency::Annual,
            other => {
                warn!("Unrecognized compounding frequency '{other}'. Assuming semi-annual.");
                CompoundingFrequency::SemiAnnual
            }
        }
    }
}

/// Terms of one fixed deposit.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FixedDepositTerms {
    pub principal: Decimal,
    /// Annual interest rate in percent, e.g. `7.0` for 7%.
    pub annual_rate_pct: Decimal,
    pub start_date: NaiveDate,
    pub maturity_date: NaiveDate,
    pub frequency: CompoundingFrequency,
}

/// Projected value of a deposit at maturity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaturityProjection {
    pub principal: Decimal,
    pub maturity_amount: Decimal,
    pub interest_earned: Decimal,
    /// Tenor in years under the 365-day convention.
    pub tenor_years: Decimal,
    pub frequency: CompoundingFrequency,
}
