//! In-memory ledger backing the analytics engine.
//!
//! The reference `LedgerReaderTrait` implementation: a plain in-process
//! store for embedding callers that keep their ledger elsewhere and feed it
//! in, and for integration tests. Inserts assign monotonically increasing
//! sequences so same-date transactions replay in insertion order.

use std::collections::HashMap;
use std::sync::RwLock;

use rust_decimal::Decimal;

use hearthfolio_core::errors::{Error, Result};
use hearthfolio_core::instruments::Instrument;
use hearthfolio_core::ledger::{sort_for_replay, LedgerReaderTrait, Transaction};

#[derive(Default)]
struct LedgerState {
    instruments: Vec<Instrument>,
    transactions: Vec<Transaction>,
    prices: HashMap<String, Decimal>,
    next_sequence: i64,
}

/// Append-only in-memory ledger.
#[derive(Default)]
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces an instrument's metadata.
    pub fn upsert_instrument(&self, instrument: Instrument) -> Result<()> {
        let mut state = self.write()?;
        if let Some(existing) = state.instruments.iter_mut().find(|i| i.id == instrument.id) {
            *existing = instrument;
        } else {
            state.instruments.push(instrument);
        }
        Ok(())
    }

    /// Appends a transaction. The stored copy gets the next insertion
    /// sequence; the sequence on the passed value is ignored.
    pub fn append_transaction(&self, mut transaction: Transaction) -> Result<()> {
        let mut state = self.write()?;
        state.next_sequence += 1;
        transaction.sequence = state.next_sequence;
        state.transactions.push(transaction);
        Ok(())
    }

    /// Sets the latest quoted price of an instrument.
    pub fn set_price(&self, instrument_id: &str, price: Decimal) -> Result<()> {
        let mut state = self.write()?;
        state.prices.insert(instrument_id.to_string(), price);
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, LedgerState>> {
        self.state
            .read()
            .map_err(|_| Error::Ledger("ledger lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, LedgerState>> {
        self.state
            .write()
            .map_err(|_| Error::Ledger("ledger lock poisoned".to_string()))
    }
}

impl LedgerReaderTrait for InMemoryLedger {
    fn list_transactions(&self, instrument_id: Option<&str>) -> Result<Vec<Transaction>> {
        let state = self.read()?;
        let mut transactions: Vec<Transaction> = state
            .transactions
            .iter()
            .filter(|t| instrument_id.map_or(true, |id| t.instrument_id == id))
            .cloned()
            .collect();
        sort_for_replay(&mut transactions);
        Ok(transactions)
    }

    fn list_instruments(&self) -> Result<Vec<Instrument>> {
        Ok(self.read()?.instruments.clone())
    }

    fn get_instrument(&self, instrument_id: &str) -> Result<Instrument> {
        self.read()?
            .instruments
            .iter()
            .find(|i| i.id == instrument_id)
            .cloned()
            .ok_or_else(|| Error::Ledger(format!("unknown instrument {instrument_id}")))
    }

    fn get_current_price(&self, instrument_id: &str) -> Result<Option<Decimal>> {
        Ok(self.read()?.prices.get(instrument_id).copied())
    }
}
