//! Shared in-memory ledger mock for service tests.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::{Error, Result};
use crate::instruments::Instrument;
use crate::ledger::{LedgerReaderTrait, Transaction, TransactionType};

#[derive(Default)]
pub struct MockLedger {
    pub instruments: Vec<Instrument>,
    pub transactions: Vec<Transaction>,
    pub prices: HashMap<String, Decimal>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instrument(mut self, instrument: Instrument) -> Self {
        self.instruments.push(instrument);
        self
    }

    pub fn with_transaction(mut self, transaction: Transaction) -> Self {
        self.transactions.push(transaction);
        self
    }

    pub fn with_price(mut self, instrument_id: &str, price: Decimal) -> Self {
        self.prices.insert(instrument_id.to_string(), price);
        self
    }
}

impl LedgerReaderTrait for MockLedger {
    fn list_transactions(&self, instrument_id: Option<&str>) -> Result<Vec<Transaction>> {
        Ok(self
            .transactions
            .iter()
            .filter(|t| instrument_id.map_or(true, |id| t.instrument_id == id))
            .cloned()
            .collect())
    }

    fn list_instruments(&self) -> Result<Vec<Instrument>> {
        Ok(self.instruments.clone())
    }

    fn get_instrument(&self, instrument_id: &str) -> Result<Instrument> {
        self.instruments
            .iter()
            .find(|i| i.id == instrument_id)
            .cloned()
            .ok_or_else(|| Error::Ledger(format!("unknown instrument {instrument_id}")))
    }

    fn get_current_price(&self, instrument_id: &str) -> Result<Option<Decimal>> {
        Ok(self.prices.get(instrument_id).copied())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn buy(
    id: &str,
    instrument: &str,
    day: NaiveDate,
    quantity: Decimal,
    unit_price: Decimal,
    sequence: i64,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        instrument_id: instrument.to_string(),
        transaction_type: TransactionType::Buy,
        transaction_date: day,
        quantity: Some(quantity),
        unit_price: Some(unit_price),
        amount: Decimal::ZERO,
        sequence,
    }
}

pub fn sell(
    id: &str,
    instrument: &str,
    day: NaiveDate,
    quantity: Decimal,
    unit_price: Decimal,
    sequence: i64,
) -> Transaction {
    Transaction {
        transaction_type: TransactionType::Sell,
        ..buy(id, instrument, day, quantity, unit_price, sequence)
    }
}

pub fn contribution(
    id: &str,
    instrument: &str,
    day: NaiveDate,
    amount: Decimal,
    sequence: i64,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        instrument_id: instrument.to_string(),
        transaction_type: TransactionType::Contribution,
        transaction_date: day,
        quantity: None,
        unit_price: None,
        amount,
        sequence,
    }
}

pub fn interest(
    id: &str,
    instrument: &str,
    day: NaiveDate,
    amount: Decimal,
    sequence: i64,
) -> Transaction {
    Transaction {
        transaction_type: TransactionType::Interest,
        ..contribution(id, instrument, day, amount, sequence)
    }
}
