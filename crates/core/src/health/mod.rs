mod health_model;
mod health_service;

pub use health_model::{
    AllocationHealth, ConcentrationBand, ConcentrationMetrics, DiversificationMetrics,
    HealthConfig, HealthOutcome, HealthReport, StockAllocationDetail, TopGroup, TopHolding,
};
pub use health_service::{HealthService, HealthServiceTrait};
