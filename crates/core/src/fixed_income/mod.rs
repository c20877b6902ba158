mod fixed_income_calculator;
mod fixed_income_model;

pub use fixed_income_calculator::project_maturity;
pub use fixed_income_model::{CompoundingFrequency, FixedDepositTerms, MaturityProjection};
