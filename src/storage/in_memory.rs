//! In-memory implementation of RecordStore for testing and development

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use super::ledger::{LedgerRow, RelationshipLedger};
use crate::config::GeneratorConfig;
use crate::core::store::{Record, RecordStore};
use crate::resolvers::formula::RelationshipKey;
use crate::resolvers::value_to_id;

/// In-memory record store backed by a relationship ledger
///
/// Records are kept per type in insertion order. Relationship formulas stored
/// on a record are evaluated against the ledger on every read, so a record
/// always shows the current set of linked ids. Uses RwLock for thread-safe
/// access; clones share the same data.
#[derive(Clone)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<HashMap<String, IndexMap<String, Record>>>>,
    ledger: Arc<RwLock<RelationshipLedger>>,
}

impl InMemoryRecordStore {
    /// Create an empty store using the default ledger sheet
    pub fn new() -> Self {
        Self::with_ledger(RelationshipLedger::default())
    }

    /// Create an empty store whose ledger matches `config.ledger_sheet`
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::with_ledger(RelationshipLedger::new(config.ledger_sheet.clone()))
    }

    pub fn with_ledger(ledger: RelationshipLedger) -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            ledger: Arc::new(RwLock::new(ledger)),
        }
    }

    /// Link a relationship field instance to one target id
    pub fn link(&self, key: RelationshipKey, target_id: &str) -> Result<()> {
        let mut ledger = self
            .ledger
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        tracing::debug!(
            source_type = %key.source_type,
            source_id = %key.source_id,
            field = %key.field_name,
            %target_id,
            "Linking records"
        );
        ledger.link(key, target_id);
        Ok(())
    }

    /// Remove a link, returning whether any row was dropped
    pub fn unlink(&self, key: &RelationshipKey, target_id: &str) -> Result<bool> {
        let mut ledger = self
            .ledger
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(ledger.unlink(key, target_id) > 0)
    }

    /// Snapshot of the ledger rows
    pub fn ledger_rows(&self) -> Result<Vec<LedgerRow>> {
        let ledger = self
            .ledger
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(ledger.rows().to_vec())
    }

    /// Number of records stored for `type_name`
    pub fn count(&self, type_name: &str) -> Result<usize> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.get(type_name).map_or(0, IndexMap::len))
    }

    /// Replace every formula-valued field with its evaluated id list
    fn evaluate(&self, records: Vec<Record>) -> Result<Vec<Record>> {
        let ledger = self
            .ledger
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records
            .into_iter()
            .map(|mut record| {
                for value in record.values_mut() {
                    let evaluated = match value {
                        Value::String(raw) => ledger.evaluate(raw),
                        _ => None,
                    };
                    if let Some(ids) = evaluated {
                        *value = Value::String(ids);
                    }
                }
                record
            })
            .collect())
    }

    fn evaluate_one(&self, record: Option<Record>) -> Result<Option<Record>> {
        match record {
            Some(record) => Ok(self.evaluate(vec![record])?.pop()),
            None => Ok(None),
        }
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn find_record(&self, type_name: &str, id: &str) -> Result<Option<Record>> {
        let found = {
            let records = self
                .records
                .read()
                .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

            records.get(type_name).and_then(|t| t.get(id)).cloned()
        };

        self.evaluate_one(found)
    }

    async fn find_all(&self, type_name: &str) -> Result<Vec<Record>> {
        let found = {
            let records = self
                .records
                .read()
                .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

            records
                .get(type_name)
                .map(|t| t.values().cloned().collect())
                .unwrap_or_default()
        };

        self.evaluate(found)
    }

    async fn find_records(&self, type_name: &str, ids: &[String]) -> Result<Vec<Record>> {
        let found = {
            let records = self
                .records
                .read()
                .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

            match records.get(type_name) {
                Some(t) => ids.iter().filter_map(|id| t.get(id).cloned()).collect(),
                None => Vec::new(),
            }
        };

        self.evaluate(found)
    }

    async fn create_record(&self, type_name: &str, mut props: Record) -> Result<Record> {
        let id = match props.get("id").and_then(value_to_id) {
            Some(id) => id,
            None => {
                let id = self.new_id();
                props.insert("id".to_string(), Value::String(id.clone()));
                id
            }
        };
        // Formulas quote ids with `'`, which the ledger cannot read back
        if id.contains('\'') {
            bail!("{} id '{}' must not contain a single quote", type_name, id);
        }

        {
            let mut records = self
                .records
                .write()
                .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

            let table = records.entry(type_name.to_string()).or_default();
            if table.contains_key(&id) {
                bail!("{} '{}' already exists", type_name, id);
            }
            table.insert(id.clone(), props.clone());
        }

        tracing::debug!(%type_name, %id, "Created record");
        Ok(self.evaluate(vec![props])?.pop().unwrap_or_default())
    }

    async fn update_record(&self, type_name: &str, props: Record) -> Result<Option<Record>> {
        let Some(id) = props.get("id").and_then(value_to_id) else {
            bail!("Cannot update {} without an id", type_name);
        };

        let updated = {
            let mut records = self
                .records
                .write()
                .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

            records
                .get_mut(type_name)
                .and_then(|t| t.get_mut(&id))
                .map(|existing| {
                    existing.extend(props);
                    existing.clone()
                })
        };

        if updated.is_none() {
            tracing::debug!(%type_name, %id, "Update skipped, record not found");
        }
        self.evaluate_one(updated)
    }

    async fn delete_record(&self, type_name: &str, id: &str) -> Result<()> {
        let removed = {
            let mut records = self
                .records
                .write()
                .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

            records
                .get_mut(type_name)
                .and_then(|t| t.shift_remove(id))
                .is_some()
        };

        let unlinked = self
            .ledger
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?
            .remove_entity(type_name, id);

        tracing::debug!(%type_name, %id, removed, unlinked, "Deleted record");
        Ok(())
    }

    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
