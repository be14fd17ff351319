//! # Field Values
//!
//! Typed values held by records, and the equality rules used by
//! domains and condition checks.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Reference to a record of another model
#[derive(Debug, Clone, PartialEq)]
pub struct RecordRef {
    pub id: i64,
    pub display_name: String,
}

/// A single field value as read from the store
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Binary(Vec<u8>),
    /// Many2one value, resolved to the referenced record
    Relation(RecordRef),
}

impl FieldValue {
    /// Equality against a JSON value supplied by a client.
    ///
    /// Relations compare the referenced id, never the display name.
    /// Null matches both `null` and `false`.
    pub fn matches(&self, expected: &Value) -> bool {
        match (self, expected) {
            (FieldValue::Null, Value::Null) => true,
            (FieldValue::Null, Value::Bool(false)) => true,
            (FieldValue::Boolean(a), Value::Bool(b)) => a == b,
            (FieldValue::Integer(a), Value::Number(n)) => match n.as_i64() {
                Some(b) => *a == b,
                None => n.as_f64() == Some(*a as f64),
            },
            (FieldValue::Float(a), Value::Number(n)) => n.as_f64() == Some(*a),
            (FieldValue::Text(a), Value::String(b)) => a == b,
            (FieldValue::Date(a), Value::String(b)) => parse_date(b) == Some(*a),
            (FieldValue::DateTime(a), Value::String(b)) => parse_datetime(b) == Some(*a),
            (FieldValue::Binary(a), Value::String(b)) => STANDARD.encode(a) == *b,
            (FieldValue::Relation(r), Value::Number(n)) => n.as_i64() == Some(r.id),
            _ => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

/// Parse a calendar date (`YYYY-MM-DD`)
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Parse a datetime.
///
/// Accepts RFC 3339 with an offset (normalised to UTC) and naive
/// `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS` with optional fraction.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}
