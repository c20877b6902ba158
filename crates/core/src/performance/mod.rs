mod flow_builder;
mod performance_model;
mod performance_service;
mod xirr_solver;

pub use flow_builder::build_flows;
pub use performance_model::{CashFlow, XirrConfig, XirrOutcome};
pub use performance_service::{PerformanceService, PerformanceServiceTrait};
pub use xirr_solver::solve_xirr;
