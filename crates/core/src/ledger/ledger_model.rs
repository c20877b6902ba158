use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::AMOUNT_CROSSCHECK_TOLERANCE;
use crate::errors::{Result, ValidationError};

/// Enum representing the supported ledger transaction types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Buy,
    Sell,
    /// Money added to a non-market instrument (retirement, savings, lending).
    Contribution,
    /// Interest credited to a non-market instrument balance.
    Interest,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        use crate::ledger::ledger_constants::*;
        match self {
            TransactionType::Buy => TRANSACTION_TYPE_BUY,
            TransactionType::Sell => TRANSACTION_TYPE_SELL,
            TransactionType::Contribution => TRANSACTION_TYPE_CONTRIBUTION,
            TransactionType::Interest => TRANSACTION_TYPE_INTEREST,
        }
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        use crate::ledger::ledger_constants::*;
        match s.trim().to_uppercase().as_str() {
            TRANSACTION_TYPE_BUY => Ok(TransactionType::Buy),
            TRANSACTION_TYPE_SELL => Ok(TransactionType::Sell),
            TRANSACTION_TYPE_CONTRIBUTION => Ok(TransactionType::Contribution),
            TRANSACTION_TYPE_INTEREST => Ok(TransactionType::Interest),
            other => Err(ValidationError::UnknownTransactionType(other.to_string())),
        }
    }
}

/// A single immutable ledger transaction as stored by the ledger reader.
///
/// Amendments are new transactions; deletions require full re-aggregation by
/// the caller. `sequence` is the insertion order and breaks same-date ties so
/// replay stays stable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub instrument_id: String,
    pub transaction_type: TransactionType,
    pub transaction_date: NaiveDate,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub amount: Decimal,
    pub sequence: i64,
}

/// A transaction whose shape has been validated against its type.
///
/// The aggregator only ever sees this tagged form: a trade always carries a
/// positive quantity and unit price, a cash flow always carries a bare
/// amount. The loose "quantity and/or amount, whichever is present" shape of
/// the raw `Transaction` never crosses this boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionKind {
    Buy { quantity: Decimal, unit_price: Decimal },
    Sell { quantity: Decimal, unit_price: Decimal },
    Contribution { amount: Decimal },
    Interest { amount: Decimal },
}

impl Transaction {
    /// Validates the transaction shape and returns its tagged kind.
    ///
    /// Buy/Sell require a strictly positive quantity and unit price; when a
    /// non-zero amount is also supplied it must agree with quantity x price.
    /// Contribution/Interest require an amount and must not carry a
    /// quantity or price.
    pub fn kind(&self) -> Result<TransactionKind> {
        let context = || format!("transaction {}", self.id);

        match self.transaction_type {
            TransactionType::Buy | TransactionType::Sell => {
                let quantity = self.quantity.ok_or(ValidationError::MissingField {
                    field: "quantity",
                    context: context(),
                })?;
                let unit_price = self.unit_price.ok_or(ValidationError::MissingField {
                    field: "unitPrice",
                    context: context(),
                })?;
                if !quantity.is_sign_positive() || quantity.is_zero() {
                    return Err(ValidationError::NonPositiveQuantity {
                        quantity,
                        context: context(),
                    }
                    .into());
                }
                if !unit_price.is_sign_positive() || unit_price.is_zero() {
                    return Err(ValidationError::NonPositivePrice {
                        price: unit_price,
                        context: context(),
                    }
                    .into());
                }
                let expected = quantity * unit_price;
                if !self.amount.is_zero() {
                    let tolerance = Decimal::from_str(AMOUNT_CROSSCHECK_TOLERANCE)
                        .unwrap_or(Decimal::ZERO);
                    if (self.amount - expected).abs() > tolerance {
                        return Err(ValidationError::AmountMismatch {
                            amount: self.amount,
                            expected,
                            context: context(),
                        }
                        .into());
                    }
                }
                Ok(match self.transaction_type {
                    TransactionType::Buy => TransactionKind::Buy {
                        quantity,
                        unit_price,
                    },
                    _ => TransactionKind::Sell {
                        quantity,
                        unit_price,
                    },
                })
            }
            TransactionType::Contribution | TransactionType::Interest => {
                if self.quantity.is_some() {
                    return Err(ValidationError::UnexpectedField {
                        field: "quantity",
                        context: context(),
                    }
                    .into());
                }
                if self.unit_price.is_some() {
                    return Err(ValidationError::UnexpectedField {
                        field: "unitPrice",
                        context: context(),
                    }
                    .into());
                }
                if self.amount.is_zero() || self.amount.is_sign_negative() {
                    return Err(ValidationError::MissingField {
                        field: "amount",
                        context: context(),
                    }
                    .into());
                }
                Ok(match self.transaction_type {
                    TransactionType::Contribution => TransactionKind::Contribution {
                        amount: self.amount,
                    },
                    _ => TransactionKind::Interest {
                        amount: self.amount,
                    },
                })
            }
        }
    }

    /// The gross monetary value of the transaction.
    ///
    /// For trades this is quantity x unit price regardless of the stored
    /// amount; for cash flows it is the amount itself.
    pub fn gross_value(&self) -> Result<Decimal> {
        Ok(match self.kind()? {
            TransactionKind::Buy {
                quantity,
                unit_price,
            }
            | TransactionKind::Sell {
                quantity,
                unit_price,
            } => quantity * unit_price,
            TransactionKind::Contribution { amount } | TransactionKind::Interest { amount } => {
                amount
            }
        })
    }
}

/// Sorts transactions into replay order: by date, ties broken by insertion
/// sequence.
pub fn sort_for_replay(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        a.transaction_date
            .cmp(&b.transaction_date)
            .then(a.sequence.cmp(&b.sequence))
    });
}
