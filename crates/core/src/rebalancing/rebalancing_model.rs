use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::instruments::MarketCapTier;

/// Allocation targets a rebalancing run is evaluated against.
///
/// Passed into every run and read fresh; the engine never caches a copy, so
/// callers can adjust targets between runs without rebuilding services.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllocationTargets {
    /// Maximum portfolio share per market-cap tier, in percent.
    pub max_large_cap_pct: Decimal,
    pub max_mid_cap_pct: Decimal,
    pub max_small_cap_pct: Decimal,
    pub max_micro_cap_pct: Decimal,
    /// Maximum portfolio share per sector, in percent.
    pub max_sector_pct: Decimal,
    /// A group at or above `max x moderate_buffer_ratio` is flagged as
    /// moderately overweight before it breaches the cap.
    pub moderate_buffer_ratio: Decimal,
    /// A group below `max x underweight_ratio` is flagged as underweight.
    pub underweight_ratio: Decimal,
    /// Per-stock target share by tier, in percent.
    pub stock_target_large_pct: Decimal,
    pub stock_target_mid_pct: Decimal,
    pub stock_target_small_pct: Decimal,
    /// Headroom above the stock target that still counts as balanced.
    pub stock_green_margin_pct: Decimal,
}

impl Default for AllocationTargets {
    fn default() -> Self {
        Self {
            max_large_cap_pct: dec!(50),
            max_mid_cap_pct: dec!(30),
            max_small_cap_pct: dec!(25),
            max_micro_cap_pct: dec!(15),
            max_sector_pct: dec!(20),
            moderate_buffer_ratio: dec!(0.9),
            underweight_ratio: dec!(0.5),
            stock_target_large_pct: dec!(5),
            stock_target_mid_pct: dec!(3),
            stock_target_small_pct: dec!(2),
            stock_green_margin_pct: dec!(0.5),
        }
    }
}

impl AllocationTargets {
    pub fn max_for_tier(&self, tier: MarketCapTier) -> Decimal {
        match tier {
            MarketCapTier::Large => self.max_large_cap_pct,
            MarketCapTier::Mid => self.max_mid_cap_pct,
            MarketCapTier::Small => self.max_small_cap_pct,
            MarketCapTier::Micro => self.max_micro_cap_pct,
        }
    }

    /// Per-stock target share for a tier. Small and Micro share a target.
    pub fn stock_target(&self, tier: MarketCapTier) -> Decimal {
        match tier {
            MarketCapTier::Large => self.stock_target_large_pct,
            MarketCapTier::Mid => self.stock_target_mid_pct,
            MarketCapTier::Small | MarketCapTier::Micro => self.stock_target_small_pct,
        }
    }

    /// Upper edge of the balanced band for a per-stock allocation.
    pub fn stock_green_max(&self, tier: MarketCapTier) -> Decimal {
        self.stock_target(tier) + self.stock_green_margin_pct
    }
}

/// Status of a tier or sector group relative to its cap.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum GroupStatus {
    Overweight,
    ModerateOverweight,
    Underweight,
    Balanced,
    /// The group has no cap (unknown tier); carries guidance instead of a
    /// weight verdict.
    Unknown,
}

/// Per-stock allocation verdict against its tier threshold.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum StockAllocationStatus {
    OverAllocated,
    Balanced,
    UnderAllocated,
}

/// Aggregate view of one tier or sector group.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecommendation {
    /// Tier name or sector name.
    pub label: String,
    pub invested_amount: Decimal,
    pub percentage: Decimal,
    pub instrument_count: usize,
    pub instruments: Vec<String>,
    pub status: GroupStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_allowed_pct: Option<Decimal>,
    pub reason: String,
}

/// One over-allocated stock and the amount to trim.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReduceItem {
    pub instrument_id: String,
    pub symbol: String,
    pub name: String,
    pub market_cap_tier: MarketCapTier,
    pub current_pct: Decimal,
    pub target_pct: Decimal,
    pub excess_pct: Decimal,
    pub reduce_amount: Decimal,
    pub current_invested: Decimal,
    pub reason: String,
}

/// One under-allocated stock and the amount that would close the gap.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddItem {
    pub instrument_id: String,
    pub symbol: String,
    pub name: String,
    pub market_cap_tier: MarketCapTier,
    pub current_pct: Decimal,
    pub target_pct: Decimal,
    pub shortfall_pct: Decimal,
    pub add_amount: Decimal,
    pub current_invested: Decimal,
    /// The current price sits inside the instrument's buy zone. A boost
    /// signal for prioritization, never a filter.
    pub in_buy_zone: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_price: Option<Decimal>,
    pub reason: String,
}

/// Overall verdict, distinguishable from "not computed".
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PortfolioRebalanceStatus {
    Balanced,
    ActionSuggested,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RebalancingReport {
    pub status: PortfolioRebalanceStatus,
    pub reduce: Vec<ReduceItem>,
    pub add: Vec<AddItem>,
    pub tier_recommendations: Vec<GroupRecommendation>,
    pub sector_recommendations: Vec<GroupRecommendation>,
}
