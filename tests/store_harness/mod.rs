//! Shared test harness for record store testing
//!
//! Provides `RecordingStore`, a `RecordStore` double that records every call,
//! the `record_store_tests!` conformance suite and helpers for building
//! records.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//! use store_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
mod record_store_tests;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

use sheetql::core::store::{Record, RecordStore};

// ---------------------------------------------------------------------------
// RecordingStore
// ---------------------------------------------------------------------------

/// One observed store call
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    FindRecord(String, String),
    FindAll(String),
    FindRecords(String, Vec<String>),
    CreateRecord(String, Record),
    UpdateRecord(String, Record),
    DeleteRecord(String, String),
    NewId,
}

/// Store double answering reads from records seeded by id
///
/// The type name is recorded but not used for lookups. Creates and updates
/// echo their input. `new_id` hands out queued ids and
/// falls back to `id-<n>` once the queue is empty.
#[derive(Default)]
pub struct RecordingStore {
    calls: Mutex<Vec<StoreCall>>,
    ids: Mutex<VecDeque<String>>,
    seeded: Mutex<IndexMap<String, Record>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids(ids: &[&str]) -> Self {
        let store = Self::new();
        store
            .ids
            .lock()
            .unwrap()
            .extend(ids.iter().map(|id| id.to_string()));
        store
    }

    pub fn seed(&self, records: Vec<Record>) {
        let mut seeded = self.seeded.lock().unwrap();
        for record in records {
            let id = record["id"].as_str().unwrap().to_string();
            seeded.insert(id, record);
        }
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn creates(&self) -> Vec<(String, Record)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::CreateRecord(t, props) => Some((t, props)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, matcher: fn(&StoreCall) -> bool) -> usize {
        self.calls().iter().filter(|call| matcher(call)).count()
    }

    fn push(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RecordStore for RecordingStore {
    async fn find_record(&self, type_name: &str, id: &str) -> Result<Option<Record>> {
        self.push(StoreCall::FindRecord(type_name.to_string(), id.to_string()));
        Ok(self.seeded.lock().unwrap().get(id).cloned())
    }

    async fn find_all(&self, type_name: &str) -> Result<Vec<Record>> {
        self.push(StoreCall::FindAll(type_name.to_string()));
        Ok(self.seeded.lock().unwrap().values().cloned().collect())
    }

    async fn find_records(&self, type_name: &str, ids: &[String]) -> Result<Vec<Record>> {
        self.push(StoreCall::FindRecords(type_name.to_string(), ids.to_vec()));
        let seeded = self.seeded.lock().unwrap();
        Ok(ids.iter().filter_map(|id| seeded.get(id).cloned()).collect())
    }

    async fn create_record(&self, type_name: &str, props: Record) -> Result<Record> {
        self.push(StoreCall::CreateRecord(type_name.to_string(), props.clone()));
        Ok(props)
    }

    async fn update_record(&self, type_name: &str, props: Record) -> Result<Option<Record>> {
        self.push(StoreCall::UpdateRecord(type_name.to_string(), props.clone()));
        Ok(Some(props))
    }

    async fn delete_record(&self, type_name: &str, id: &str) -> Result<()> {
        self.push(StoreCall::DeleteRecord(type_name.to_string(), id.to_string()));
        Ok(())
    }

    fn new_id(&self) -> String {
        self.push(StoreCall::NewId);
        let issued = self.count(|call| matches!(call, StoreCall::NewId));
        self.ids
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| format!("id-{}", issued))
    }
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Build a record from a `json!` object literal
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

/// Build a resolver argument map from a `json!` object literal
pub fn args(value: Value) -> Record {
    record(value)
}

/// Ids of `records`, in order
pub fn ids_of(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.get("id").and_then(Value::as_str).unwrap_or_default().to_string())
        .collect()
}

/// Store that fails every call, for error propagation tests
pub struct FailingStore(pub &'static str);

#[async_trait]
impl RecordStore for FailingStore {
    async fn find_record(&self, _type_name: &str, _id: &str) -> Result<Option<Record>> {
        Err(anyhow!(self.0))
    }

    async fn find_all(&self, _type_name: &str) -> Result<Vec<Record>> {
        Err(anyhow!(self.0))
    }

    async fn find_records(&self, _type_name: &str, _ids: &[String]) -> Result<Vec<Record>> {
        Err(anyhow!(self.0))
    }

    async fn create_record(&self, _type_name: &str, _props: Record) -> Result<Record> {
        Err(anyhow!(self.0))
    }

    async fn update_record(&self, _type_name: &str, _props: Record) -> Result<Option<Record>> {
        Err(anyhow!(self.0))
    }

    async fn delete_record(&self, _type_name: &str, _id: &str) -> Result<()> {
        Err(anyhow!(self.0))
    }

    fn new_id(&self) -> String {
        "never-persisted".to_string()
    }
}
