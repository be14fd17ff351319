//! # In-Memory Model Store
//!
//! Schema-checked tables held in memory. Each operation takes the table
//! lock once, so a create, write or unlink is applied entirely or not at
//! all.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::{Map, Value};

use super::domain::Domain;
use super::errors::{StoreError, StoreResult};
use super::schema::{FieldType, ModelSchema};
use super::value::{FieldValue, RecordRef};
use super::{ModelStore, Record};

type Row = BTreeMap<String, FieldValue>;

#[derive(Debug, Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Row>,
}

type Tables = HashMap<String, Table>;

/// In-memory implementation of [`ModelStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    schemas: HashMap<String, ModelSchema>,
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a set of schemas.
    ///
    /// Many2one fields may point at any model in the set, including the
    /// model itself, regardless of declaration order.
    pub fn from_schemas(schemas: impl IntoIterator<Item = ModelSchema>) -> StoreResult<Self> {
        let mut store = Self::new();
        for schema in schemas {
            store.insert_schema(schema)?;
        }
        for schema in store.schemas.values() {
            store.check_comodels(schema)?;
        }
        Ok(store)
    }

    /// Register one more model. Its comodels must already be registered.
    pub fn register(&mut self, schema: ModelSchema) -> StoreResult<()> {
        let name = schema.name.clone();
        self.insert_schema(schema)?;
        let checked = match self.schemas.get(&name) {
            Some(schema) => self.check_comodels(schema),
            None => Ok(()),
        };
        if checked.is_err() {
            self.schemas.remove(&name);
            if let Ok(tables) = self.tables.get_mut() {
                tables.remove(&name);
            }
        }
        checked
    }

    fn insert_schema(&mut self, schema: ModelSchema) -> StoreResult<()> {
        schema.validate()?;
        if self.schemas.contains_key(&schema.name) {
            return Err(StoreError::DuplicateModel(schema.name));
        }
        self.tables
            .get_mut()
            .map_err(|_| StoreError::Internal("Lock poisoned".to_string()))?
            .insert(schema.name.clone(), Table::default());
        self.schemas.insert(schema.name.clone(), schema);
        Ok(())
    }

    fn check_comodels(&self, schema: &ModelSchema) -> StoreResult<()> {
        for (field, def) in &schema.fields {
            if let Some(comodel) = &def.comodel {
                if !self.schemas.contains_key(comodel) {
                    return Err(StoreError::InvalidSchema(format!(
                        "{}.{}: unknown comodel '{}'",
                        schema.name, field, comodel
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn schema(&self, model: &str) -> StoreResult<&ModelSchema> {
        self.schemas
            .get(model)
            .ok_or_else(|| StoreError::UnknownModel(model.to_string()))
    }

    fn read_tables(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Internal("Lock poisoned".to_string()))
    }

    fn write_tables(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Internal("Lock poisoned".to_string()))
    }

    /// Check that a field name can be read on the model
    fn check_readable(schema: &ModelSchema, field: &str) -> StoreResult<()> {
        if field == "id" || field == "display_name" || schema.fields.contains_key(field) {
            Ok(())
        } else {
            Err(StoreError::UnknownField {
                model: schema.name.clone(),
                field: field.to_string(),
            })
        }
    }

    fn display_name(schema: &ModelSchema, id: i64, row: &Row) -> String {
        match row.get("name") {
            Some(FieldValue::Text(name)) => name.clone(),
            _ => format!("{},{}", schema.name, id),
        }
    }

    /// Resolve one field of a stored row into its read form
    fn resolve(
        &self,
        tables: &Tables,
        schema: &ModelSchema,
        id: i64,
        row: &Row,
        field: &str,
    ) -> StoreResult<FieldValue> {
        match field {
            "id" => return Ok(FieldValue::Integer(id)),
            "display_name" => return Ok(FieldValue::Text(Self::display_name(schema, id, row))),
            _ => {}
        }

        let def = schema.field(field).ok_or_else(|| StoreError::UnknownField {
            model: schema.name.clone(),
            field: field.to_string(),
        })?;
        let raw = row.get(field).cloned().unwrap_or_else(|| def.default_value());

        match (def.field_type, &def.comodel, raw) {
            (FieldType::Many2one, Some(comodel), FieldValue::Integer(target)) => {
                let target_schema = self.schema(comodel)?;
                let target_row = tables.get(comodel).and_then(|t| t.rows.get(&target));
                // A deleted target reads as an empty relation.
                Ok(match target_row {
                    Some(target_row) => FieldValue::Relation(RecordRef {
                        id: target,
                        display_name: Self::display_name(target_schema, target, target_row),
                    }),
                    None => FieldValue::Null,
                })
            }
            (_, _, value) => Ok(value),
        }
    }

    fn build_record(
        &self,
        tables: &Tables,
        schema: &ModelSchema,
        id: i64,
        row: &Row,
        fields: Option<&[String]>,
    ) -> StoreResult<Record> {
        let mut record = Record::new(id);
        match fields {
            Some(fields) => {
                for field in fields.iter().filter(|f| f.as_str() != "id") {
                    let value = self.resolve(tables, schema, id, row, field)?;
                    record.fields.insert(field.clone(), value);
                }
            }
            None => {
                for field in schema.fields.keys() {
                    let value = self.resolve(tables, schema, id, row, field)?;
                    record.fields.insert(field.clone(), value);
                }
                record.fields.insert(
                    "display_name".to_string(),
                    FieldValue::Text(Self::display_name(schema, id, row)),
                );
            }
        }
        Ok(record)
    }

    fn locate<'t>(tables: &'t Tables, model: &str, id: i64) -> StoreResult<&'t Row> {
        tables
            .get(model)
            .and_then(|t| t.rows.get(&id))
            .ok_or_else(|| StoreError::RecordNotFound {
                model: model.to_string(),
                id,
            })
    }

    /// Fail on the first guard condition the row does not satisfy.
    /// Fields the model does not have read as null.
    fn check_guard(
        &self,
        tables: &Tables,
        schema: &ModelSchema,
        id: i64,
        row: &Row,
        guard: &Domain,
    ) -> StoreResult<()> {
        for condition in guard.iter() {
            let found = match Self::check_readable(schema, &condition.field) {
                Ok(()) => self.resolve(tables, schema, id, row, &condition.field)?,
                Err(_) => FieldValue::Null,
            };
            if !found.matches(&condition.value) {
                return Err(StoreError::GuardFailed {
                    model: schema.name.clone(),
                    field: condition.field.clone(),
                    expected: condition.value.clone(),
                    found,
                });
            }
        }
        Ok(())
    }

    /// Validate and coerce client values into a partial row
    fn prepare_values(
        &self,
        tables: &Tables,
        schema: &ModelSchema,
        values: &Map<String, Value>,
    ) -> StoreResult<Row> {
        let mut row = Row::new();
        for (field, value) in values {
            if field == "id" || field == "display_name" {
                return Err(StoreError::invalid_value(
                    &schema.name,
                    field,
                    "field is read-only",
                ));
            }
            let def = schema.field(field).ok_or_else(|| StoreError::UnknownField {
                model: schema.name.clone(),
                field: field.clone(),
            })?;
            let coerced = def.coerce(&schema.name, field, value)?;

            if let (Some(comodel), FieldValue::Integer(target)) = (&def.comodel, &coerced) {
                let exists = tables
                    .get(comodel)
                    .map(|t| t.rows.contains_key(target))
                    .unwrap_or(false);
                if !exists {
                    return Err(StoreError::MissingReference {
                        model: comodel.clone(),
                        id: *target,
                    });
                }
            }

            if def.required && coerced.is_null() {
                return Err(StoreError::MissingRequired {
                    model: schema.name.clone(),
                    field: field.clone(),
                });
            }
            row.insert(field.clone(), coerced);
        }
        Ok(row)
    }
}

impl ModelStore for MemoryStore {
    fn has_model(&self, model: &str) -> bool {
        self.schemas.contains_key(model)
    }

    fn models(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.keys().cloned().collect();
        names.sort();
        names
    }

    fn search_read(
        &self,
        model: &str,
        domain: &Domain,
        fields: Option<&[String]>,
    ) -> StoreResult<Vec<Record>> {
        let schema = self.schema(model)?;
        for condition in domain.iter() {
            Self::check_readable(schema, &condition.field)?;
        }
        if let Some(fields) = fields {
            for field in fields {
                Self::check_readable(schema, field)?;
            }
        }

        let tables = self.read_tables()?;
        let table = match tables.get(model) {
            Some(table) => table,
            None => return Ok(Vec::new()),
        };

        let mut records = Vec::new();
        for (id, row) in &table.rows {
            let mut matched = true;
            for condition in domain.iter() {
                let value = self.resolve(&tables, schema, *id, row, &condition.field)?;
                if !value.matches(&condition.value) {
                    matched = false;
                    break;
                }
            }
            if matched {
                records.push(self.build_record(&tables, schema, *id, row, fields)?);
            }
        }
        Ok(records)
    }

    fn browse(&self, model: &str, id: i64) -> StoreResult<Option<Record>> {
        let schema = self.schema(model)?;
        let tables = self.read_tables()?;
        match tables.get(model).and_then(|t| t.rows.get(&id)) {
            Some(row) => Ok(Some(self.build_record(&tables, schema, id, row, None)?)),
            None => Ok(None),
        }
    }

    fn create(&self, model: &str, values: &Map<String, Value>) -> StoreResult<i64> {
        let schema = self.schema(model)?;
        let mut tables = self.write_tables()?;

        let row = self.prepare_values(&tables, schema, values)?;
        for (field, def) in &schema.fields {
            if def.required && row.get(field).map_or(true, FieldValue::is_null) {
                return Err(StoreError::MissingRequired {
                    model: model.to_string(),
                    field: field.clone(),
                });
            }
        }

        let table = tables.entry(model.to_string()).or_default();
        table.next_id += 1;
        let id = table.next_id;
        table.rows.insert(id, row);
        Ok(id)
    }

    fn write_if(
        &self,
        model: &str,
        id: i64,
        guard: &Domain,
        values: &Map<String, Value>,
    ) -> StoreResult<()> {
        let schema = self.schema(model)?;
        let mut tables = self.write_tables()?;

        let row = Self::locate(&tables, model, id)?;
        self.check_guard(&tables, schema, id, row, guard)?;

        let updates = self.prepare_values(&tables, schema, values)?;
        let row = tables
            .get_mut(model)
            .and_then(|t| t.rows.get_mut(&id))
            .ok_or_else(|| StoreError::RecordNotFound {
                model: model.to_string(),
                id,
            })?;
        row.extend(updates);
        Ok(())
    }

    fn unlink_if(
        &self,
        model: &str,
        id: i64,
        guard: &Domain,
        fields: &[String],
    ) -> StoreResult<Record> {
        let schema = self.schema(model)?;
        for field in fields {
            Self::check_readable(schema, field)?;
        }
        let mut tables = self.write_tables()?;

        let row = Self::locate(&tables, model, id)?;
        self.check_guard(&tables, schema, id, row, guard)?;
        let snapshot = self.build_record(&tables, schema, id, row, Some(fields))?;

        tables.get_mut(model).and_then(|t| t.rows.remove(&id));
        Ok(snapshot)
    }
}
