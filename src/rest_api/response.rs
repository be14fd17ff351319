//! # Response Encoding
//!
//! Envelope types and the JSON form of store records.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::store::{FieldValue, Record};

/// ISO-8601 without offset
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Used when the timestamp has a non-zero microsecond part
pub const DATETIME_MICROS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `{"success": true, "data": ...}`
#[derive(Debug, Clone, Serialize)]
pub struct SuccessEnvelope<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> SuccessEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for SuccessEnvelope<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// `{"success": false, "error": "..."}`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

pub fn encode_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Boolean(b) => Value::Bool(*b),
        FieldValue::Integer(i) => Value::from(*i),
        FieldValue::Float(f) => Value::from(*f),
        FieldValue::Text(s) => Value::String(s.clone()),
        FieldValue::Date(d) => Value::String(d.format(DATE_FORMAT).to_string()),
        FieldValue::DateTime(dt) => Value::String(format_datetime(dt)),
        FieldValue::Binary(bytes) => Value::String(STANDARD.encode(bytes)),
        FieldValue::Relation(r) => json!([r.id, r.display_name]),
    }
}

fn format_datetime(dt: &NaiveDateTime) -> String {
    let format = if dt.nanosecond() / 1_000 == 0 {
        DATETIME_FORMAT
    } else {
        DATETIME_MICROS_FORMAT
    };
    dt.format(format).to_string()
}

pub fn encode_record(record: &Record) -> Value {
    let mut obj = Map::new();
    obj.insert("id".to_string(), Value::from(record.id));
    for (field, value) in &record.fields {
        obj.insert(field.clone(), encode_value(value));
    }
    Value::Object(obj)
}

pub fn encode_records(records: &[Record]) -> Value {
    Value::Array(records.iter().map(encode_record).collect())
}
