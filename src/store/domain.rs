//! # Search Domains
//!
//! A domain is a conjunction of equality conditions on record fields.

use serde_json::Value;

/// `field = value`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub value: Value,
}

impl Condition {
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            value,
        }
    }
}

/// Conditions combined with AND; the empty domain matches every record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Domain {
    pub conditions: Vec<Condition>,
}

impl Domain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Domain selecting a single record by id
    pub fn by_id(id: i64) -> Self {
        Self::new().and(Condition::eq("id", Value::from(id)))
    }

    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_by_id() {
        let domain = Domain::by_id(5);
        assert_eq!(domain.conditions, vec![Condition::eq("id", json!(5))]);
    }

    #[test]
    fn test_and_preserves_order() {
        let domain = Domain::new()
            .and(Condition::eq("active", json!(true)))
            .and(Condition::eq("name", json!("Gemini Furniture")));

        let fields: Vec<_> = domain.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["active", "name"]);
    }
}
