//! Core module containing the error types and the store port

pub mod error;
pub mod store;

pub use error::{ExecutionError, ResolverError, SchemaError, SheetqlError};
pub use store::{Record, RecordStore};
