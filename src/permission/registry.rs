//! # Permission Registry
//!
//! Thread-safe table of permission records, read on every request and
//! edited by administrators.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::errors::{PermissionError, PermissionResult};
use super::record::{authorize, HttpVerb, PermissionRecord};

#[derive(Debug, Default)]
pub struct PermissionRegistry {
    records: RwLock<HashMap<String, PermissionRecord>>,
}

impl PermissionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry; later records for the same model win
    pub fn from_records(records: impl IntoIterator<Item = PermissionRecord>) -> Self {
        let map = records
            .into_iter()
            .map(|r| (r.model.clone(), r))
            .collect();
        Self {
            records: RwLock::new(map),
        }
    }

    fn read(&self) -> PermissionResult<RwLockReadGuard<'_, HashMap<String, PermissionRecord>>> {
        self.records
            .read()
            .map_err(|_| PermissionError::Internal("Lock poisoned".to_string()))
    }

    fn write(&self) -> PermissionResult<RwLockWriteGuard<'_, HashMap<String, PermissionRecord>>> {
        self.records
            .write()
            .map_err(|_| PermissionError::Internal("Lock poisoned".to_string()))
    }

    pub fn get(&self, model: &str) -> PermissionResult<Option<PermissionRecord>> {
        Ok(self.read()?.get(model).cloned())
    }

    /// All records, sorted by model name
    pub fn list(&self) -> PermissionResult<Vec<PermissionRecord>> {
        let mut records: Vec<_> = self.read()?.values().cloned().collect();
        records.sort_by(|a, b| a.model.cmp(&b.model));
        Ok(records)
    }

    /// Insert or replace; returns the previous record
    pub fn upsert(&self, record: PermissionRecord) -> PermissionResult<Option<PermissionRecord>> {
        Ok(self.write()?.insert(record.model.clone(), record))
    }

    pub fn remove(&self, model: &str) -> PermissionResult<Option<PermissionRecord>> {
        Ok(self.write()?.remove(model))
    }

    /// Check `verb` against the current record for `model`
    pub fn check(&self, model: &str, verb: HttpVerb) -> PermissionResult<()> {
        let records = self.read()?;
        authorize(model, records.get(model), verb)
    }
}
