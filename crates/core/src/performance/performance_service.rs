use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use log::debug;

use crate::errors::Result;
use crate::holdings::{replay_transactions, HoldingsService, HoldingsServiceTrait};
use crate::instruments::AssetClass;
use crate::ledger::{LedgerReaderTrait, Transaction};

use super::flow_builder::build_flows;
use super::performance_model::{XirrConfig, XirrOutcome};
use super::xirr_solver::solve_xirr;

/// Trait for the performance service.
pub trait PerformanceServiceTrait: Send + Sync {
    /// Money-weighted annualized return, scoped to one asset class or
    /// computed over the merged flow stream of the whole portfolio.
    fn compute_xirr(&self, asset_class: Option<AssetClass>) -> Result<XirrOutcome>;

    /// Per-class XIRR map over every class that has flows in the ledger.
    fn compute_xirr_by_class(&self) -> Result<HashMap<AssetClass, XirrOutcome>>;
}

pub struct PerformanceService {
    ledger: Arc<dyn LedgerReaderTrait>,
    holdings: HoldingsService,
    config: XirrConfig,
}

impl PerformanceService {
    pub fn new(ledger: Arc<dyn LedgerReaderTrait>, config: XirrConfig) -> Self {
        let holdings = HoldingsService::new(ledger.clone());
        Self {
            ledger,
            holdings,
            config,
        }
    }

    /// Same as `compute_xirr` with an explicit valuation date.
    pub fn compute_xirr_as_of(
        &self,
        asset_class: Option<AssetClass>,
        as_of: NaiveDate,
    ) -> Result<XirrOutcome> {
        let instruments = self.ledger.list_instruments()?;
        let in_scope: HashSet<&str> = instruments
            .iter()
            .filter(|i| asset_class.map_or(true, |class| i.asset_class == class))
            .map(|i| i.id.as_str())
            .collect();

        let scoped: Vec<Transaction> = self
            .ledger
            .list_transactions(None)?
            .into_iter()
            .filter(|t| in_scope.contains(t.instrument_id.as_str()))
            .collect();

        // Instruments whose streams violate ledger invariants are excluded
        // from the flow stream the same way the aggregator excludes them.
        let replay = replay_transactions(scoped.clone());
        let clean: Vec<Transaction> = scoped
            .into_iter()
            .filter(|t| replay.states.contains_key(&t.instrument_id))
            .collect();

        let holdings = self.holdings.compute_holdings(asset_class)?;
        let terminal_value = holdings.total_value();
        debug!(
            "XIRR scope {:?}: {} flows, terminal value {}",
            asset_class,
            clean.len(),
            terminal_value
        );

        let flows = build_flows(&clean, terminal_value, as_of)?;
        Ok(solve_xirr(&flows, &self.config))
    }
}

impl PerformanceServiceTrait for PerformanceService {
    fn compute_xirr(&self, asset_class: Option<AssetClass>) -> Result<XirrOutcome> {
        self.compute_xirr_as_of(asset_class, Utc::now().date_naive())
    }

    fn compute_xirr_by_class(&self) -> Result<HashMap<AssetClass, XirrOutcome>> {
        let as_of = Utc::now().date_naive();
        let instruments = self.ledger.list_instruments()?;
        let classes: HashSet<AssetClass> = instruments.iter().map(|i| i.asset_class).collect();

        let mut results = HashMap::new();
        for class in classes {
            results.insert(class, self.compute_xirr_as_of(Some(class), as_of)?);
        }
        Ok(results)
    }
}
