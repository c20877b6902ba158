//! Facade wiring the analytics services over one ledger reader.

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::Result;
use crate::fixed_income::{project_maturity, FixedDepositTerms, MaturityProjection};
use crate::health::{HealthConfig, HealthOutcome, HealthService, HealthServiceTrait};
use crate::holdings::{HoldingsComputation, HoldingsService, HoldingsServiceTrait};
use crate::instruments::AssetClass;
use crate::ledger::LedgerReaderTrait;
use crate::performance::{
    PerformanceService, PerformanceServiceTrait, XirrConfig, XirrOutcome,
};
use crate::rebalancing::{
    AllocationTargets, RebalancingReport, RebalancingService, RebalancingServiceTrait,
};
use crate::zones::{ZoneAlert, ZoneAlertService, ZoneAlertServiceTrait, ZoneConfig};

/// Stateless entry point for embedding callers.
///
/// Every operation re-reads the ledger through the shared reader; nothing is
/// cached between calls, so two calls with an unchanged ledger return
/// identical results and a changed ledger is picked up immediately.
pub struct AnalyticsEngine {
    holdings: HoldingsService,
    performance: PerformanceService,
    health: HealthService,
    rebalancing: RebalancingService,
    zones: ZoneAlertService,
}

impl AnalyticsEngine {
    pub fn new(ledger: Arc<dyn LedgerReaderTrait>) -> Self {
        Self {
            holdings: HoldingsService::new(ledger.clone()),
            performance: PerformanceService::new(ledger.clone(), XirrConfig::default()),
            health: HealthService::new(ledger.clone()),
            rebalancing: RebalancingService::new(ledger.clone()),
            zones: ZoneAlertService::new(ledger, ZoneConfig::default()),
        }
    }

    /// Current holdings reconstructed from the ledger, optionally scoped to
    /// one asset class.
    pub fn compute_holdings(
        &self,
        asset_class: Option<AssetClass>,
    ) -> Result<HoldingsComputation> {
        self.holdings.compute_holdings(asset_class)
    }

    /// Money-weighted annualized return for one class, or unified across
    /// the whole portfolio when no class is given.
    pub fn compute_xirr(&self, asset_class: Option<AssetClass>) -> Result<XirrOutcome> {
        self.performance.compute_xirr(asset_class)
    }

    /// Per-class XIRR map.
    pub fn compute_xirr_by_class(&self) -> Result<HashMap<AssetClass, XirrOutcome>> {
        self.performance.compute_xirr_by_class()
    }

    /// Concentration, diversification, and allocation health of the equity
    /// holdings.
    pub fn compute_concentration_and_diversification(
        &self,
        config: &HealthConfig,
        targets: &AllocationTargets,
    ) -> Result<HealthOutcome> {
        self.health.compute_health(config, targets)
    }

    /// Rebalancing recommendations against the given targets.
    pub fn compute_rebalancing(&self, targets: &AllocationTargets) -> Result<RebalancingReport> {
        self.rebalancing.compute_rebalancing(targets)
    }

    /// Price-zone alerts for every instrument with zones and a price.
    pub fn evaluate_price_zones(&self) -> Result<HashMap<String, Vec<ZoneAlert>>> {
        self.zones.evaluate_price_zones()
    }

    /// Maturity projection for one fixed deposit. Pure; does not touch the
    /// ledger.
    pub fn compute_fd_maturity(&self, terms: &FixedDepositTerms) -> Result<MaturityProjection> {
        project_maturity(terms)
    }
}
