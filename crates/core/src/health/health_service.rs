use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::Result;
use crate::holdings::{Holding, HoldingsService, HoldingsServiceTrait};
use crate::instruments::{AssetClass, MarketCapTier};
use crate::ledger::LedgerReaderTrait;
use crate::rebalancing::{classify_stock_allocation, AllocationTargets, StockAllocationStatus};

use super::health_model::{
    AllocationHealth, ConcentrationBand, ConcentrationMetrics, DiversificationMetrics,
    HealthConfig, HealthOutcome, HealthReport, StockAllocationDetail, TopGroup, TopHolding,
};

const HHI_PRECISION: u32 = 4;

/// Trait for the health service.
pub trait HealthServiceTrait: Send + Sync {
    /// Scores concentration, diversification, and allocation balance of the
    /// current equity holdings.
    fn compute_health(
        &self,
        config: &HealthConfig,
        targets: &AllocationTargets,
    ) -> Result<HealthOutcome>;
}

pub struct HealthService {
    holdings: HoldingsService,
}

struct StockView {
    instrument_id: String,
    symbol: String,
    sector: Option<String>,
    tier: Option<MarketCapTier>,
    invested: Decimal,
    weight: Decimal,
}

impl HealthService {
    pub fn new(ledger: Arc<dyn LedgerReaderTrait>) -> Self {
        Self {
            holdings: HoldingsService::new(ledger),
        }
    }

    fn concentration(stocks: &[StockView], total: Decimal, config: &HealthConfig) -> ConcentrationMetrics {
        let mut by_invested: Vec<&StockView> = stocks.iter().collect();
        by_invested.sort_by(|a, b| {
            b.invested
                .cmp(&a.invested)
                .then_with(|| a.instrument_id.cmp(&b.instrument_id))
        });

        let top3: Vec<TopHolding> = by_invested
            .iter()
            .take(3)
            .map(|s| TopHolding {
                instrument_id: s.instrument_id.clone(),
                symbol: s.symbol.clone(),
                invested_amount: s.invested,
                percentage: (s.weight * dec!(100)).round_dp(DISPLAY_DECIMAL_PRECISION),
            })
            .collect();
        let top3_invested: Decimal = by_invested.iter().take(3).map(|s| s.invested).sum();
        let top3_pct = (top3_invested / total * dec!(100)).round_dp(DISPLAY_DECIMAL_PRECISION);

        let top_sector = top_group(stocks, total, |s| {
            Some(s.sector.clone().unwrap_or_else(|| "Other".to_string()))
        });
        let top_tier = top_group(stocks, total, |s| s.tier.map(|t| t.as_str().to_string()));

        let hhi: Decimal = stocks.iter().map(|s| s.weight * s.weight).sum();
        let hhi = hhi.round_dp(HHI_PRECISION);
        let hhi_band = if hhi < config.hhi_good_max {
            ConcentrationBand::Good
        } else if hhi <= config.hhi_moderate_max {
            ConcentrationBand::Moderate
        } else {
            ConcentrationBand::Concentrated
        };

        ConcentrationMetrics {
            top3_pct,
            top3,
            top_sector,
            top_tier,
            hhi,
            hhi_band,
        }
    }

    fn diversification(
        stocks: &[StockView],
        hhi: Decimal,
        config: &HealthConfig,
    ) -> DiversificationMetrics {
        let sectors: HashSet<&str> = stocks.iter().filter_map(|s| s.sector.as_deref()).collect();
        let tiers: HashSet<MarketCapTier> = stocks.iter().filter_map(|s| s.tier).collect();

        let count_score = |count: usize, target: u32| -> Decimal {
            (Decimal::from(count as u64) / Decimal::from(target) * dec!(100)).min(dec!(100))
        };
        let instrument_score = count_score(stocks.len(), config.target_instrument_count);
        let sector_score = count_score(sectors.len(), config.target_sector_count);
        let tier_score = count_score(tiers.len(), config.target_tier_count);
        let hhi_score = (Decimal::ONE - hhi) * dec!(100);

        let score = (instrument_score * config.weight_instruments
            + sector_score * config.weight_sectors
            + tier_score * config.weight_tiers
            + hhi_score * config.weight_hhi)
            .round_dp(DISPLAY_DECIMAL_PRECISION);

        DiversificationMetrics {
            instrument_count: stocks.len(),
            sector_count: sectors.len(),
            tier_count: tiers.len(),
            score,
        }
    }

    fn allocation(stocks: &[StockView], targets: &AllocationTargets) -> AllocationHealth {
        let mut over_allocated = 0;
        let mut balanced = 0;
        let mut under_allocated = 0;
        let mut details = Vec::with_capacity(stocks.len());

        for stock in stocks {
            // Classify on the unrounded share; round only for display.
            let percentage = stock.weight * dec!(100);
            let status = classify_stock_allocation(percentage, stock.tier, targets);
            match status {
                StockAllocationStatus::OverAllocated => over_allocated += 1,
                StockAllocationStatus::Balanced => balanced += 1,
                StockAllocationStatus::UnderAllocated => under_allocated += 1,
            }
            details.push(StockAllocationDetail {
                instrument_id: stock.instrument_id.clone(),
                symbol: stock.symbol.clone(),
                status,
                percentage: percentage.round_dp(DISPLAY_DECIMAL_PRECISION),
                market_cap_tier: stock.tier,
                threshold_pct: stock.tier.map(|t| targets.stock_target(t)),
            });
        }

        details.sort_by(|a, b| a.instrument_id.cmp(&b.instrument_id));
        AllocationHealth {
            over_allocated,
            balanced,
            under_allocated,
            details,
        }
    }

    fn overall_score(
        concentration: &ConcentrationMetrics,
        diversification: &DiversificationMetrics,
        allocation: &AllocationHealth,
        config: &HealthConfig,
    ) -> Decimal {
        // Concentration component: full marks below the ideal cap, linear
        // decay to 50 at the bad threshold, faster decay to 0 beyond it.
        let conc = concentration.top3_pct;
        let span = config.concentration_bad_min_pct - config.concentration_ideal_max_pct;
        let concentration_score = if conc < config.concentration_ideal_max_pct {
            dec!(100)
        } else if conc < config.concentration_bad_min_pct {
            dec!(100) - (conc - config.concentration_ideal_max_pct) / span * dec!(50)
        } else {
            (dec!(50) - (conc - config.concentration_bad_min_pct) / span * dec!(50))
                .max(Decimal::ZERO)
        };

        let total_stocks = allocation.over_allocated + allocation.balanced + allocation.under_allocated;
        let allocation_score = if total_stocks > 0 {
            Decimal::from(allocation.balanced as u64) / Decimal::from(total_stocks as u64)
                * dec!(100)
        } else {
            Decimal::ZERO
        };

        (diversification.score * config.weight_diversification
            + concentration_score * config.weight_concentration
            + allocation_score * config.weight_allocation)
            .round_dp(DISPLAY_DECIMAL_PRECISION)
    }
}

impl HealthServiceTrait for HealthService {
    fn compute_health(
        &self,
        config: &HealthConfig,
        targets: &AllocationTargets,
    ) -> Result<HealthOutcome> {
        let computation = self.holdings.compute_holdings(Some(AssetClass::Equity))?;
        let total = computation.total_invested();
        if computation.holdings.is_empty() || total.is_zero() {
            debug!("No equity holdings to score");
            return Ok(HealthOutcome::NoData);
        }

        let stocks: Vec<StockView> = computation
            .holdings
            .iter()
            .filter_map(|holding| match holding {
                Holding::Position {
                    instrument_id,
                    symbol,
                    sector,
                    market_cap_tier,
                    invested_amount,
                    ..
                } => Some(StockView {
                    instrument_id: instrument_id.clone(),
                    symbol: symbol.clone(),
                    sector: sector.clone(),
                    tier: *market_cap_tier,
                    invested: *invested_amount,
                    weight: *invested_amount / total,
                }),
                Holding::Balance { .. } => None,
            })
            .collect();
        if stocks.is_empty() {
            return Ok(HealthOutcome::NoData);
        }

        let concentration = Self::concentration(&stocks, total, config);
        let diversification = Self::diversification(&stocks, concentration.hhi, config);
        let allocation = Self::allocation(&stocks, targets);
        let overall_score =
            Self::overall_score(&concentration, &diversification, &allocation, config);

        Ok(HealthOutcome::Report(HealthReport {
            concentration,
            diversification,
            allocation,
            overall_score,
        }))
    }
}

fn top_group(
    stocks: &[StockView],
    total: Decimal,
    key: impl Fn(&StockView) -> Option<String>,
) -> Option<TopGroup> {
    let mut totals: HashMap<String, Decimal> = HashMap::new();
    for stock in stocks {
        if let Some(name) = key(stock) {
            *totals.entry(name).or_insert(Decimal::ZERO) += stock.invested;
        }
    }
    totals
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(name, invested)| TopGroup {
            name,
            invested_amount: invested,
            percentage: (invested / total * dec!(100)).round_dp(DISPLAY_DECIMAL_PRECISION),
        })
}
