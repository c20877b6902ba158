/// Days per year used for all year-fraction math (XIRR discounting and
/// fixed-deposit tenors). A simple calendar-day convention, kept in place of
/// banker's day-count rules as documented policy.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Convergence tolerance on |NPV| for the XIRR root finder.
pub const XIRR_TOLERANCE: f64 = 1e-6;

/// Iteration cap shared by the Newton-Raphson and bisection phases.
pub const XIRR_MAX_ITERATIONS: u32 = 100;

/// Lower bound of the rate search interval (-99.9%).
pub const XIRR_RATE_MIN: f64 = -0.999;

/// Upper bound of the rate search interval (+1000%).
pub const XIRR_RATE_MAX: f64 = 10.0;

/// Quantities below this threshold are treated as fully liquidated.
pub const QUANTITY_THRESHOLD: &str = "0.00000001";

/// Decimal places kept on percentages and monetary outputs.
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Tolerance used when cross-checking a supplied amount against
/// quantity x unit_price during boundary validation.
pub const AMOUNT_CROSSCHECK_TOLERANCE: &str = "0.000001";
