//! # Backend Model Store
//!
//! The gateway never persists anything itself. Every read and write goes
//! through [`ModelStore`], a small search/browse/create/write/unlink
//! interface. The bundled [`MemoryStore`] is what the server and tests run
//! on.

pub mod domain;
pub mod errors;
pub mod memory;
pub mod schema;
pub mod value;

use std::collections::BTreeMap;

use serde_json::{Map, Value};

pub use domain::{Condition, Domain};
pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use schema::{FieldDef, FieldType, ModelSchema};
pub use value::{FieldValue, RecordRef};

/// A record as returned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: i64,

    /// Selected fields, excluding `id`
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            fields: BTreeMap::new(),
        }
    }

    /// Read a field; fields the record does not carry read as null
    pub fn get(&self, field: &str) -> FieldValue {
        if field == "id" {
            return FieldValue::Integer(self.id);
        }
        self.fields.get(field).cloned().unwrap_or(FieldValue::Null)
    }
}

/// Backend store operations used by the gateway
pub trait ModelStore: Send + Sync {
    /// Whether the model is known to the store
    fn has_model(&self, model: &str) -> bool;

    /// Names of all known models, sorted
    fn models(&self) -> Vec<String>;

    /// Records matching the domain, ordered by id.
    ///
    /// `fields = None` reads every field.
    fn search_read(
        &self,
        model: &str,
        domain: &Domain,
        fields: Option<&[String]>,
    ) -> StoreResult<Vec<Record>>;

    /// Full record by id, `None` if it does not exist
    fn browse(&self, model: &str, id: i64) -> StoreResult<Option<Record>>;

    /// Create a record, returning its id
    fn create(&self, model: &str, values: &Map<String, Value>) -> StoreResult<i64>;

    /// Update fields of a record that exists and matches `guard`.
    ///
    /// The existence check, the guard and the update happen as one step, so
    /// a concurrent change can never slip between them.
    fn write_if(
        &self,
        model: &str,
        id: i64,
        guard: &Domain,
        values: &Map<String, Value>,
    ) -> StoreResult<()>;

    /// Delete a record that exists and matches `guard`, returning `fields`
    /// as read just before removal
    fn unlink_if(
        &self,
        model: &str,
        id: i64,
        guard: &Domain,
        fields: &[String],
    ) -> StoreResult<Record>;

    /// Update fields of an existing record
    fn write(&self, model: &str, id: i64, values: &Map<String, Value>) -> StoreResult<()> {
        self.write_if(model, id, &Domain::new(), values)
    }

    /// Delete a record
    fn unlink(&self, model: &str, id: i64) -> StoreResult<()> {
        self.unlink_if(model, id, &Domain::new(), &[]).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_get() {
        let mut record = Record::new(3);
        record
            .fields
            .insert("name".to_string(), FieldValue::Text("Lumber Inc".to_string()));

        assert_eq!(record.get("id"), FieldValue::Integer(3));
        assert_eq!(record.get("name"), FieldValue::Text("Lumber Inc".to_string()));
        assert_eq!(record.get("missing"), FieldValue::Null);
    }
}
