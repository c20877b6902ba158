use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::Result;
use crate::holdings::{Holding, HoldingsService, HoldingsServiceTrait};
use crate::instruments::{AssetClass, Instrument, MarketCapTier};
use crate::ledger::LedgerReaderTrait;

use super::rebalancing_model::{
    AddItem, AllocationTargets, GroupRecommendation, GroupStatus, PortfolioRebalanceStatus,
    RebalancingReport, ReduceItem, StockAllocationStatus,
};

/// Trait for the rebalancing service.
pub trait RebalancingServiceTrait: Send + Sync {
    /// Evaluates current equity holdings against the given targets.
    fn compute_rebalancing(&self, targets: &AllocationTargets) -> Result<RebalancingReport>;
}

pub struct RebalancingService {
    ledger: Arc<dyn LedgerReaderTrait>,
    holdings: HoldingsService,
}

/// Classifies one stock's share of the portfolio against its tier target.
/// Stocks without a tier carry no threshold and count as balanced.
pub fn classify_stock_allocation(
    percentage: Decimal,
    tier: Option<MarketCapTier>,
    targets: &AllocationTargets,
) -> StockAllocationStatus {
    let tier = match tier {
        Some(tier) => tier,
        None => return StockAllocationStatus::Balanced,
    };
    if percentage > targets.stock_green_max(tier) {
        StockAllocationStatus::OverAllocated
    } else if percentage >= targets.stock_target(tier) {
        StockAllocationStatus::Balanced
    } else {
        StockAllocationStatus::UnderAllocated
    }
}

/// Classifies a group's unrounded share against its cap. Percentages are
/// rounded for the reason text only, never for the comparison.
fn classify_group(
    label: &str,
    percentage: Decimal,
    max_allowed: Decimal,
    targets: &AllocationTargets,
) -> (GroupStatus, String) {
    let display = percentage.round_dp(DISPLAY_DECIMAL_PRECISION);
    if percentage > max_allowed {
        let excess = (percentage - max_allowed).round_dp(DISPLAY_DECIMAL_PRECISION);
        (
            GroupStatus::Overweight,
            format!("{label} over-allocated by {excess}%: {display}% held vs {max_allowed}% cap"),
        )
    } else if percentage >= max_allowed * targets.moderate_buffer_ratio {
        (
            GroupStatus::ModerateOverweight,
            format!("{label} near its {max_allowed}% cap at {display}%"),
        )
    } else if percentage < max_allowed * targets.underweight_ratio {
        (
            GroupStatus::Underweight,
            format!("{label} under-allocated: {display}% held vs {max_allowed}% cap"),
        )
    } else {
        (
            GroupStatus::Balanced,
            format!("{label} balanced within its {max_allowed}% cap"),
        )
    }
}

struct PositionView<'a> {
    instrument_id: &'a str,
    symbol: &'a str,
    name: &'a str,
    sector: Option<&'a str>,
    tier: Option<MarketCapTier>,
    invested: Decimal,
    current_price: Option<Decimal>,
    percentage: Decimal,
}

impl RebalancingService {
    pub fn new(ledger: Arc<dyn LedgerReaderTrait>) -> Self {
        let holdings = HoldingsService::new(ledger.clone());
        Self { ledger, holdings }
    }

    fn group_recommendations<'a>(
        positions: &[PositionView<'a>],
        total: Decimal,
        targets: &AllocationTargets,
        key: impl Fn(&PositionView<'a>) -> (String, Option<Decimal>),
    ) -> Vec<GroupRecommendation> {
        let mut groups: BTreeMap<String, (Option<Decimal>, Decimal, Vec<String>)> = BTreeMap::new();
        for position in positions {
            let (label, max_allowed) = key(position);
            let entry = groups.entry(label).or_insert((max_allowed, Decimal::ZERO, Vec::new()));
            entry.1 += position.invested;
            entry.2.push(position.symbol.to_string());
        }

        let mut recommendations: Vec<GroupRecommendation> = groups
            .into_iter()
            .map(|(label, (max_allowed, invested, instruments))| {
                let percentage = invested / total * dec!(100);
                let (status, reason) = match max_allowed {
                    Some(max) => classify_group(&label, percentage, max, targets),
                    None => (
                        GroupStatus::Unknown,
                        format!("{label}: set a market cap tier for allocation guidance"),
                    ),
                };
                GroupRecommendation {
                    instrument_count: instruments.len(),
                    label,
                    invested_amount: invested.round_dp(DISPLAY_DECIMAL_PRECISION),
                    percentage: percentage.round_dp(DISPLAY_DECIMAL_PRECISION),
                    instruments,
                    status,
                    max_allowed_pct: max_allowed,
                    reason,
                }
            })
            .collect();

        recommendations.sort_by(|a, b| {
            b.percentage
                .cmp(&a.percentage)
                .then_with(|| a.label.cmp(&b.label))
        });
        recommendations
    }
}

impl RebalancingServiceTrait for RebalancingService {
    fn compute_rebalancing(&self, targets: &AllocationTargets) -> Result<RebalancingReport> {
        let computation = self.holdings.compute_holdings(Some(AssetClass::Equity))?;
        let instruments = self.ledger.list_instruments()?;
        let instrument_of = |id: &str| instruments.iter().find(|i| i.id == id);

        let total = computation.total_invested();
        if computation.holdings.is_empty() || total.is_zero() {
            debug!("No equity holdings; rebalancing trivially balanced");
            return Ok(RebalancingReport {
                status: PortfolioRebalanceStatus::Balanced,
                reduce: Vec::new(),
                add: Vec::new(),
                tier_recommendations: Vec::new(),
                sector_recommendations: Vec::new(),
            });
        }

        let positions: Vec<PositionView<'_>> = computation
            .holdings
            .iter()
            .filter_map(|holding| match holding {
                Holding::Position {
                    instrument_id,
                    symbol,
                    name,
                    sector,
                    market_cap_tier,
                    invested_amount,
                    current_price,
                    ..
                } => Some(PositionView {
                    instrument_id,
                    symbol,
                    name,
                    sector: sector.as_deref(),
                    tier: *market_cap_tier,
                    invested: *invested_amount,
                    current_price: *current_price,
                    percentage: *invested_amount / total * dec!(100),
                }),
                Holding::Balance { .. } => None,
            })
            .collect();

        let mut reduce = Vec::new();
        let mut add = Vec::new();

        for position in &positions {
            let tier = match position.tier {
                Some(tier) => tier,
                None => continue,
            };
            let target = targets.stock_target(tier);
            let green_max = targets.stock_green_max(tier);

            // Thresholds compare the unrounded share; rounding is for display only.
            let current_pct = position.percentage.round_dp(DISPLAY_DECIMAL_PRECISION);

            if position.percentage > green_max {
                let excess = position.percentage - green_max;
                let excess_pct = excess.round_dp(DISPLAY_DECIMAL_PRECISION);
                reduce.push(ReduceItem {
                    instrument_id: position.instrument_id.to_string(),
                    symbol: position.symbol.to_string(),
                    name: position.name.to_string(),
                    market_cap_tier: tier,
                    current_pct,
                    target_pct: green_max,
                    excess_pct,
                    reduce_amount: (excess / dec!(100) * total)
                        .round_dp(DISPLAY_DECIMAL_PRECISION),
                    current_invested: position.invested,
                    reason: format!(
                        "{} over-allocated by {excess_pct}%: {current_pct}% held vs {green_max}% target",
                        position.symbol
                    ),
                });
            } else if position.percentage < target {
                let shortfall = target - position.percentage;
                let shortfall_pct = shortfall.round_dp(DISPLAY_DECIMAL_PRECISION);
                let in_buy_zone = in_buy_zone(
                    instrument_of(position.instrument_id),
                    position.current_price,
                );
                let mut reason = format!(
                    "{} under-allocated by {shortfall_pct}%: {current_pct}% held vs {target}% target",
                    position.symbol
                );
                if in_buy_zone {
                    reason.push_str(" (in buy zone)");
                }
                add.push(AddItem {
                    instrument_id: position.instrument_id.to_string(),
                    symbol: position.symbol.to_string(),
                    name: position.name.to_string(),
                    market_cap_tier: tier,
                    current_pct,
                    target_pct: target,
                    shortfall_pct,
                    add_amount: (shortfall / dec!(100) * total)
                        .round_dp(DISPLAY_DECIMAL_PRECISION),
                    current_invested: position.invested,
                    in_buy_zone,
                    current_price: position.current_price,
                    reason,
                });
            }
        }

        reduce.sort_by(|a, b| {
            b.reduce_amount
                .cmp(&a.reduce_amount)
                .then_with(|| a.instrument_id.cmp(&b.instrument_id))
        });
        add.sort_by(|a, b| {
            b.shortfall_pct
                .cmp(&a.shortfall_pct)
                .then_with(|| a.instrument_id.cmp(&b.instrument_id))
        });

        let tier_recommendations =
            Self::group_recommendations(&positions, total, targets, |p| match p.tier {
                Some(tier) => (tier.as_str().to_string(), Some(targets.max_for_tier(tier))),
                None => ("UNKNOWN".to_string(), None),
            });
        let sector_recommendations =
            Self::group_recommendations(&positions, total, targets, |p| {
                (
                    p.sector.unwrap_or("Other").to_string(),
                    Some(targets.max_sector_pct),
                )
            });

        let status = if reduce.is_empty() && add.is_empty() {
            PortfolioRebalanceStatus::Balanced
        } else {
            PortfolioRebalanceStatus::ActionSuggested
        };

        Ok(RebalancingReport {
            status,
            reduce,
            add,
            tier_recommendations,
            sector_recommendations,
        })
    }
}

/// A stock counts as "in buy zone" when its price is at or below the zone's
/// upper bound.
fn in_buy_zone(instrument: Option<&Instrument>, current_price: Option<Decimal>) -> bool {
    match (instrument.and_then(|i| i.buy_zone), current_price) {
        (Some(zone), Some(price)) => price <= zone.high(),
        _ => false,
    }
}
