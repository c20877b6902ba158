use rust_decimal::Decimal;

use crate::errors::Result;
use crate::instruments::Instrument;

use super::ledger_model::Transaction;

/// Read contract of the external transaction ledger.
///
/// Implementations are synchronous, idempotent, and side-effect free: the
/// engine may call them repeatedly within one analytics request and expects
/// identical results for the same ledger state. The engine never caches
/// across requests.
pub trait LedgerReaderTrait: Send + Sync {
    /// Returns transactions for one instrument, or all transactions when
    /// `instrument_id` is `None`, ordered by date with insertion-sequence
    /// tie-break.
    fn list_transactions(&self, instrument_id: Option<&str>) -> Result<Vec<Transaction>>;

    /// Returns every tracked instrument's metadata.
    fn list_instruments(&self) -> Result<Vec<Instrument>>;

    /// Returns the metadata of a single instrument.
    fn get_instrument(&self, instrument_id: &str) -> Result<Instrument>;

    /// Returns the latest known price, or `None` when the instrument has no
    /// quoted price (non-market instruments).
    fn get_current_price(&self, instrument_id: &str) -> Result<Option<Decimal>>;
}
