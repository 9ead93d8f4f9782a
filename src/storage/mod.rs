//! Record store implementations

pub mod ledger;

#[cfg(feature = "in-memory")]
pub mod in_memory;

#[cfg(feature = "in-memory")]
pub use in_memory::InMemoryRecordStore;
pub use ledger::{LedgerRow, ParsedFormula, RelationshipLedger, parse_formula};
