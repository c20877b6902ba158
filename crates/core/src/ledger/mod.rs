//! Ledger module - transaction model, boundary validation, and the read
//! contract of the external transaction store.

pub mod ledger_constants;
mod ledger_model;
mod ledger_traits;

pub use ledger_model::{sort_for_replay, Transaction, TransactionKind, TransactionType};
pub use ledger_traits::LedgerReaderTrait;
