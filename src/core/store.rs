//! Store port consumed by the generated resolvers

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// A single stored record: field name to value
///
/// Relationship fields read back as a plain id (to-one) or a comma-joined id
/// list (to-many). On write they hold a relationship formula instead.
pub type Record = Map<String, Value>;

/// Service trait for the persistence backend behind the resolvers
///
/// This is the minimal operation set the resolver engine needs. It knows
/// nothing about the schema: every operation receives the record type name as
/// a plain string. Errors are returned as-is to the resolver's caller.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch one record by id
    ///
    /// Returns `Ok(None)` when the record does not exist.
    async fn find_record(&self, type_name: &str, id: &str) -> Result<Option<Record>>;

    /// Fetch every record of a type
    async fn find_all(&self, type_name: &str) -> Result<Vec<Record>>;

    /// Fetch several records by id
    ///
    /// Implementations should return records in the order of `ids`.
    async fn find_records(&self, type_name: &str, ids: &[String]) -> Result<Vec<Record>>;

    /// Persist a new record and return it as stored
    async fn create_record(&self, type_name: &str, props: Record) -> Result<Record>;

    /// Update an existing record
    ///
    /// `props` must contain the record's `id`. Backends that do not read the
    /// record back return `Ok(None)`.
    async fn update_record(&self, type_name: &str, props: Record) -> Result<Option<Record>>;

    /// Delete a record by id
    async fn delete_record(&self, type_name: &str, id: &str) -> Result<()>;

    /// Allocate a fresh record id
    fn new_id(&self) -> String;
}
