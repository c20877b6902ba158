use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::instruments::MarketCapTier;
use crate::rebalancing::StockAllocationStatus;

/// Weights and targets of the health scoring model.
///
/// The component weights within the diversification score sum to 1, as do
/// the three top-level weights of the overall score.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthConfig {
    /// Instrument count at which the instrument-count component maxes out.
    pub target_instrument_count: u32,
    pub target_sector_count: u32,
    pub target_tier_count: u32,
    pub weight_instruments: Decimal,
    pub weight_sectors: Decimal,
    pub weight_tiers: Decimal,
    pub weight_hhi: Decimal,
    /// HHI at or below this is a well-diversified portfolio.
    pub hhi_good_max: Decimal,
    /// HHI above this is outright concentrated.
    pub hhi_moderate_max: Decimal,
    /// Top-3 share below this costs nothing in the overall score.
    pub concentration_ideal_max_pct: Decimal,
    /// Top-3 share above this decays the concentration component faster.
    pub concentration_bad_min_pct: Decimal,
    pub weight_diversification: Decimal,
    pub weight_concentration: Decimal,
    pub weight_allocation: Decimal,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            target_instrument_count: 15,
            target_sector_count: 8,
            target_tier_count: 3,
            weight_instruments: dec!(0.3),
            weight_sectors: dec!(0.3),
            weight_tiers: dec!(0.2),
            weight_hhi: dec!(0.2),
            hhi_good_max: dec!(0.15),
            hhi_moderate_max: dec!(0.25),
            concentration_ideal_max_pct: dec!(40),
            concentration_bad_min_pct: dec!(70),
            weight_diversification: dec!(0.4),
            weight_concentration: dec!(0.3),
            weight_allocation: dec!(0.3),
        }
    }
}

/// Qualitative band of the Herfindahl-Hirschman index.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ConcentrationBand {
    Good,
    Moderate,
    Concentrated,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopHolding {
    pub instrument_id: String,
    pub symbol: String,
    pub invested_amount: Decimal,
    pub percentage: Decimal,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopGroup {
    pub name: String,
    pub invested_amount: Decimal,
    pub percentage: Decimal,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConcentrationMetrics {
    /// Share of the top three instruments, in percent.
    pub top3_pct: Decimal,
    pub top3: Vec<TopHolding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_sector: Option<TopGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_tier: Option<TopGroup>,
    /// Herfindahl-Hirschman index over invested-amount weights, 0 to 1.
    pub hhi: Decimal,
    pub hhi_band: ConcentrationBand,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiversificationMetrics {
    pub instrument_count: usize,
    pub sector_count: usize,
    pub tier_count: usize,
    /// Composite score, 0 to 100, monotonic in every input.
    pub score: Decimal,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockAllocationDetail {
    pub instrument_id: String,
    pub symbol: String,
    pub status: StockAllocationStatus,
    pub percentage: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap_tier: Option<MarketCapTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_pct: Option<Decimal>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllocationHealth {
    pub over_allocated: usize,
    pub balanced: usize,
    pub under_allocated: usize,
    pub details: Vec<StockAllocationDetail>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub concentration: ConcentrationMetrics,
    pub diversification: DiversificationMetrics,
    pub allocation: AllocationHealth,
    /// Overall health, 0 to 100.
    pub overall_score: Decimal,
}

/// Health of a portfolio, or the explicit statement that there is nothing
/// to score. An empty portfolio is never reported as a zero score.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "outcome")]
#[serde(rename_all = "camelCase")]
pub enum HealthOutcome {
    Report(HealthReport),
    NoData,
}
