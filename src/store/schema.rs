//! # Model Schemas
//!
//! Field declarations for models held by the in-memory store, and the
//! coercion of client JSON into typed field values.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{StoreError, StoreResult};
use super::value::{parse_date, parse_datetime, FieldValue};

/// Field types understood by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Boolean,
    Integer,
    Float,
    Char,
    Text,
    Date,
    Datetime,
    Binary,
    Many2one,
}

/// Declaration of a single field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Target model for many2one fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comodel: Option<String>,

    #[serde(default)]
    pub required: bool,
}

impl FieldDef {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            comodel: None,
            required: false,
        }
    }

    pub fn many2one(comodel: impl Into<String>) -> Self {
        Self {
            field_type: FieldType::Many2one,
            comodel: Some(comodel.into()),
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value a field holds before anything is written to it
    pub fn default_value(&self) -> FieldValue {
        match self.field_type {
            FieldType::Boolean => FieldValue::Boolean(false),
            _ => FieldValue::Null,
        }
    }

    /// Convert a client value into the stored representation.
    ///
    /// Many2one values are stored as the bare target id; existence of the
    /// target is checked by the store, which owns the other tables.
    pub fn coerce(&self, model: &str, field: &str, value: &Value) -> StoreResult<FieldValue> {
        if value.is_null() || (value == &Value::Bool(false) && self.field_type != FieldType::Boolean)
        {
            return Ok(self.default_value());
        }

        let mismatch = |expected: &str| {
            StoreError::invalid_value(model, field, format!("expected {}, got {}", expected, value))
        };

        match self.field_type {
            FieldType::Boolean => value
                .as_bool()
                .map(FieldValue::Boolean)
                .ok_or_else(|| mismatch("a boolean")),
            FieldType::Integer | FieldType::Many2one => value
                .as_i64()
                .map(FieldValue::Integer)
                .ok_or_else(|| mismatch("an integer")),
            FieldType::Float => value
                .as_f64()
                .map(FieldValue::Float)
                .ok_or_else(|| mismatch("a number")),
            FieldType::Char | FieldType::Text => value
                .as_str()
                .map(|s| FieldValue::Text(s.to_string()))
                .ok_or_else(|| mismatch("a string")),
            FieldType::Date => value
                .as_str()
                .and_then(parse_date)
                .map(FieldValue::Date)
                .ok_or_else(|| mismatch("a date (YYYY-MM-DD)")),
            FieldType::Datetime => value
                .as_str()
                .and_then(parse_datetime)
                .map(FieldValue::DateTime)
                .ok_or_else(|| mismatch("a datetime")),
            FieldType::Binary => value
                .as_str()
                .and_then(|s| STANDARD.decode(s).ok())
                .map(FieldValue::Binary)
                .ok_or_else(|| mismatch("base64 data")),
        }
    }
}

/// Schema of a model: its name and declared fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub name: String,

    #[serde(default)]
    pub fields: BTreeMap<String, FieldDef>,
}

impl ModelSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.insert(name.into(), def);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// Check the schema on its own (comodel existence is checked by the store)
    pub fn validate(&self) -> StoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(StoreError::InvalidSchema(
                "model name cannot be empty".to_string(),
            ));
        }

        for (name, def) in &self.fields {
            if name == "id" || name == "display_name" {
                return Err(StoreError::InvalidSchema(format!(
                    "{}: field '{}' is reserved",
                    self.name, name
                )));
            }
            match (def.field_type, &def.comodel) {
                (FieldType::Many2one, None) => {
                    return Err(StoreError::InvalidSchema(format!(
                        "{}.{}: many2one field needs a comodel",
                        self.name, name
                    )))
                }
                (FieldType::Many2one, Some(_)) | (_, None) => {}
                (_, Some(_)) => {
                    return Err(StoreError::InvalidSchema(format!(
                        "{}.{}: only many2one fields take a comodel",
                        self.name, name
                    )))
                }
            }
        }

        Ok(())
    }
}
