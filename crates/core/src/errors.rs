//! Core error types for the analytics engine.
//!
//! The engine is storage-agnostic: whatever backs the ledger reader converts
//! its own failures into `Error::Ledger` before they reach this crate's
//! callers. None of these conditions are recovered by substituting a default
//! numeric value — a non-convergent XIRR or an empty portfolio is reported as
//! such, never as 0%.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the analytics engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Data integrity violation: {0}")]
    DataIntegrity(#[from] DataIntegrityError),

    #[error("Solver did not converge after {iterations} iterations")]
    NonConvergence { iterations: u32 },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Ledger read failed: {0}")]
    Ledger(String),
}

/// Violations of ledger invariants detected during replay.
///
/// These are fatal for the offending instrument's aggregation but must not
/// abort the aggregation of other instruments.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataIntegrityError {
    #[error(
        "SELL of {requested} units of {instrument_id} on {date} exceeds held quantity {held}"
    )]
    Oversell {
        instrument_id: String,
        held: Decimal,
        requested: Decimal,
        date: NaiveDate,
    },
}

/// Validation errors for transactions, zones, and calculator inputs.
///
/// Rejected at the boundary, before any computation begins.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Required field '{field}' is missing on {context}")]
    MissingField { field: &'static str, context: String },

    #[error("Field '{field}' is not allowed on {context}")]
    UnexpectedField { field: &'static str, context: String },

    #[error("Quantity must be positive, got {quantity} on {context}")]
    NonPositiveQuantity { quantity: Decimal, context: String },

    #[error("Unit price must be positive, got {price} on {context}")]
    NonPositivePrice { price: Decimal, context: String },

    #[error(
        "Amount {amount} does not match quantity x price = {expected} on {context}"
    )]
    AmountMismatch {
        amount: Decimal,
        expected: Decimal,
        context: String,
    },

    #[error("Unknown transaction type: {0}")]
    UnknownTransactionType(String),

    #[error("Malformed price zone: {0}")]
    MalformedZone(String),

    #[error("Zone range is inverted: low {low} > high {high}")]
    InvertedZone { low: Decimal, high: Decimal },

    #[error("Maturity date {maturity} is not after start date {start}")]
    InvalidDateRange { start: NaiveDate, maturity: NaiveDate },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
