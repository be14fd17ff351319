//! # Condition Filter
//!
//! Equality conditions from the URL id and the body `conditions` map,
//! used to search (GET) and to guard mutations (PUT/DELETE).

use serde_json::{Map, Value};

use crate::store::{Condition, Domain, FieldValue, Record};

use super::errors::{RestError, RestResult};
use super::response::encode_value;

/// `id = record_id` (when given) AND every `field = value` in `conditions`
pub fn build_domain(record_id: Option<i64>, conditions: &Map<String, Value>) -> Domain {
    let mut domain = match record_id {
        Some(id) => Domain::by_id(id),
        None => Domain::new(),
    };
    for (field, value) in conditions {
        domain = domain.and(Condition::eq(field.clone(), value.clone()));
    }
    domain
}

/// Fail on the first condition the record does not satisfy
pub fn check_conditions(record: &Record, conditions: &Map<String, Value>) -> RestResult<()> {
    for (field, expected) in conditions {
        let actual = record.get(field);
        if !actual.matches(expected) {
            return Err(mismatch(field, expected, &actual));
        }
    }
    Ok(())
}

pub fn mismatch(field: &str, expected: &Value, found: &FieldValue) -> RestError {
    RestError::ConditionMismatch {
        field: field.to_string(),
        expected: render_json(expected),
        found: render_field(found),
    }
}

fn render_json(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_field(value: &FieldValue) -> String {
    match value {
        FieldValue::Relation(r) => r.id.to_string(),
        other => render_json(&encode_value(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordRef;
    use serde_json::json;

    fn conditions(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    fn sample_record() -> Record {
        let mut record = Record::new(4);
        record
            .fields
            .insert("state".to_string(), FieldValue::Text("draft".to_string()));
        record.fields.insert(
            "partner_id".to_string(),
            FieldValue::Relation(RecordRef {
                id: 11,
                display_name: "Ready Mat".to_string(),
            }),
        );
        record
    }

    #[test]
    fn test_build_domain() {
        let domain = build_domain(Some(4), &conditions(json!({"state": "draft"})));
        assert_eq!(
            domain.conditions,
            vec![
                Condition::eq("id", json!(4)),
                Condition::eq("state", json!("draft"))
            ]
        );

        assert!(build_domain(None, &Map::new()).is_empty());
    }

    #[test]
    fn test_matching_conditions_pass() {
        let record = sample_record();
        let result = check_conditions(
            &record,
            &conditions(json!({"state": "draft", "partner_id": 11, "id": 4})),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_mismatch_reports_field_and_values() {
        let record = sample_record();
        let err = check_conditions(&record, &conditions(json!({"state": "sale"}))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Condition not met: state must be sale, found draft"
        );
    }

    #[test]
    fn test_relation_compared_by_id() {
        let record = sample_record();
        let err =
            check_conditions(&record, &conditions(json!({"partner_id": "Ready Mat"}))).unwrap_err();
        assert_eq!(
            err,
            RestError::ConditionMismatch {
                field: "partner_id".to_string(),
                expected: "Ready Mat".to_string(),
                found: "11".to_string(),
            }
        );
    }

    #[test]
    fn test_absent_field_reads_as_null() {
        let record = sample_record();
        assert!(check_conditions(&record, &conditions(json!({"note": null}))).is_ok());
        assert!(check_conditions(&record, &conditions(json!({"note": "x"}))).is_err());
    }
}
