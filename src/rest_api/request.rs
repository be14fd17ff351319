//! # Gateway Requests
//!
//! Query parameters and JSON body of a `/send_request` call.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::permission::HttpVerb;

use super::errors::{RestError, RestResult};

/// Query parameter naming the target model
pub const MODEL_PARAM: &str = "model";

/// Query parameter carrying the record id
pub const ID_PARAM: &str = "Id";

/// JSON body: `{values, conditions, fields}`, all optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RequestBody {
    /// Field values for create/write
    #[serde(default)]
    pub values: Option<Map<String, Value>>,

    /// Equality constraints
    #[serde(default)]
    pub conditions: Option<Map<String, Value>>,

    /// Fields to return; `None` returns every field
    #[serde(default, deserialize_with = "deserialize_fields")]
    pub fields: Option<Vec<String>>,
}

impl RequestBody {
    pub fn conditions(&self) -> Map<String, Value> {
        self.conditions.clone().unwrap_or_default()
    }

    pub fn fields(&self) -> Option<&[String]> {
        self.fields.as_deref()
    }

    pub fn require_values(&self) -> RestResult<&Map<String, Value>> {
        self.values
            .as_ref()
            .ok_or_else(|| RestError::InvalidJson("missing 'values'".to_string()))
    }
}

/// `fields` is a list of names; `false`, `null` and `[]` all mean "all fields"
fn deserialize_fields<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => Ok(None),
        Value::Array(items) if items.is_empty() => Ok(None),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(serde::de::Error::custom(format!(
                    "field names must be strings, got {}",
                    other
                ))),
            })
            .collect::<Result<Vec<_>, D::Error>>()
            .map(Some),
        other => Err(serde::de::Error::custom(format!(
            "fields must be a list of field names, got {}",
            other
        ))),
    }
}

/// Outcome of reading the raw request body
#[derive(Debug, Clone, PartialEq)]
pub enum BodyPayload {
    Empty,
    Parsed(RequestBody),
    /// Body present but unusable; carries the parse error
    Malformed(String),
}

impl BodyPayload {
    pub fn parse(raw: &[u8]) -> Self {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return BodyPayload::Empty;
        }
        match serde_json::from_slice::<RequestBody>(raw) {
            Ok(body) => BodyPayload::Parsed(body),
            Err(e) => BodyPayload::Malformed(e.to_string()),
        }
    }

    /// Body for verbs that tolerate a missing or broken body
    pub fn lenient(&self) -> RequestBody {
        match self {
            BodyPayload::Parsed(body) => body.clone(),
            BodyPayload::Empty | BodyPayload::Malformed(_) => RequestBody::default(),
        }
    }

    /// Body for verbs that need one
    pub fn strict(&self) -> RestResult<&RequestBody> {
        match self {
            BodyPayload::Parsed(body) => Ok(body),
            BodyPayload::Empty => Err(RestError::InvalidJson("request body is empty".to_string())),
            BodyPayload::Malformed(reason) => Err(RestError::InvalidJson(reason.clone())),
        }
    }
}

/// A decoded `/send_request` call
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayRequest {
    pub verb: HttpVerb,
    pub model: Option<String>,
    /// Raw `Id` parameter; parsed by the dispatcher once the model resolves
    pub record_id: Option<String>,
    pub body: BodyPayload,
}

impl GatewayRequest {
    pub fn new(verb: HttpVerb, params: &HashMap<String, String>, raw_body: &[u8]) -> Self {
        Self {
            verb,
            model: params.get(MODEL_PARAM).cloned(),
            record_id: params.get(ID_PARAM).cloned(),
            body: BodyPayload::parse(raw_body),
        }
    }
}

/// Parse the `Id` parameter. Absent, empty and `0` all mean "no id".
pub fn parse_record_id(raw: Option<&str>) -> RestResult<Option<i64>> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(raw) => raw,
    };
    let id: i64 = raw
        .parse()
        .map_err(|_| RestError::InvalidIdentifier(raw.to_string()))?;
    Ok(if id == 0 { None } else { Some(id) })
}
