mod rebalancing_model;
mod rebalancing_service;

pub use rebalancing_model::{
    AddItem, AllocationTargets, GroupRecommendation, GroupStatus, PortfolioRebalanceStatus,
    RebalancingReport, ReduceItem, StockAllocationStatus,
};
pub use rebalancing_service::{
    classify_stock_allocation, RebalancingService, RebalancingServiceTrait,
};

#[cfg(test)]
mod rebalancing_tests;
