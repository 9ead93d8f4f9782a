//! Recording store used by the resolver unit tests

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::core::store::{Record, RecordStore};

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

/// Store double that records every call
///
/// Reads are answered from records seeded by id, whatever the type. Writes
/// echo their input and `new_id` hands out queued ids before falling back to
/// `id-<n>`.
#[derive(Default)]
pub struct RecordingStore {
    calls: Mutex<Vec<StoreCall>>,
    ids: Mutex<VecDeque<String>>,
    seeded: Mutex<IndexMap<String, Record>>,
    failure: Mutex<Option<String>>,
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

    /// Make every async operation fail with `message`
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Persisted `(type, props)` pairs in call order
    pub fn creates(&self) -> Vec<(String, Record)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::CreateRecord(t, props) => Some((t, props)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: StoreCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordStore for RecordingStore {
    async fn find_record(&self, type_name: &str, id: &str) -> Result<Option<Record>> {
        self.record(StoreCall::FindRecord(type_name.to_string(), id.to_string()))?;
        Ok(self.seeded.lock().unwrap().get(id).cloned())
    }

    async fn find_all(&self, type_name: &str) -> Result<Vec<Record>> {
        self.record(StoreCall::FindAll(type_name.to_string()))?;
        Ok(self.seeded.lock().unwrap().values().cloned().collect())
    }

    async fn find_records(&self, type_name: &str, ids: &[String]) -> Result<Vec<Record>> {
        self.record(StoreCall::FindRecords(type_name.to_string(), ids.to_vec()))?;
        let seeded = self.seeded.lock().unwrap();
        Ok(ids.iter().filter_map(|id| seeded.get(id).cloned()).collect())
    }

    async fn create_record(&self, type_name: &str, props: Record) -> Result<Record> {
        self.record(StoreCall::CreateRecord(type_name.to_string(), props.clone()))?;
        Ok(props)
    }

    async fn update_record(&self, type_name: &str, props: Record) -> Result<Option<Record>> {
        self.record(StoreCall::UpdateRecord(type_name.to_string(), props.clone()))?;
        Ok(Some(props))
    }

    async fn delete_record(&self, type_name: &str, id: &str) -> Result<()> {
        self.record(StoreCall::DeleteRecord(type_name.to_string(), id.to_string()))
    }

    fn new_id(&self) -> String {
        let mut calls = self.calls.lock().unwrap();
        calls.push(StoreCall::NewId);
        let issued = calls.iter().filter(|c| matches!(c, StoreCall::NewId)).count();
        drop(calls);

        self.ids
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| format!("id-{}", issued))
    }
}

/// Build a record from a `json!` object literal
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}
