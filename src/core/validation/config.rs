//! Declarative record schemas

use serde_json::{Map, Value};

use super::{filters, validators};
use crate::core::error::FieldValidationError;

/// Whether a field must be present in the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// Type rule for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// String; empty and null acceptance are opt-in
    Text { allow_empty: bool, nullable: bool },

    /// Date, normalized to RFC 3339 UTC once validated
    Date,
}

/// Schema rule for one field
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
}

impl FieldRule {
    /// Required non-empty, non-null string
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text {
                allow_empty: false,
                nullable: false,
            },
            presence: Presence::Required,
        }
    }

    /// Required string that also accepts `""` and `null`
    pub const fn blankable_text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text {
                allow_empty: true,
                nullable: true,
            },
            presence: Presence::Required,
        }
    }

    /// Required date
    pub const fn date(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Date,
            presence: Presence::Required,
        }
    }

    /// Same rule, but the field may be absent
    pub const fn optional(mut self) -> Self {
        self.presence = Presence::Optional;
        self
    }

    fn check(&self, value: &Value) -> Result<(), String> {
        match self.kind {
            FieldKind::Text {
                allow_empty,
                nullable,
            } => validators::text(allow_empty, nullable)(self.name, value),
            FieldKind::Date => validators::date()(self.name, value),
        }
    }

    fn filter(&self, value: Value) -> Value {
        match self.kind {
            FieldKind::Date => filters::normalize_date()(self.name, value),
            FieldKind::Text { .. } => value,
        }
    }
}

/// Schema for one operation on one record kind
///
/// Absent optional fields stay absent in the filtered payload, so a
/// validated update payload lists exactly the fields to change.
#[derive(Debug, Clone, Copy)]
pub struct RecordSchema {
    pub rules: &'static [FieldRule],
}

impl RecordSchema {
    pub const fn new(rules: &'static [FieldRule]) -> Self {
        Self { rules }
    }

    /// Validate a payload and return its normalized form
    ///
    /// All failures are collected. Keys that no rule names are rejected.
    /// A payload that is not a JSON object fails every rule.
    pub fn validate_and_filter(
        &self,
        payload: Value,
    ) -> Result<Map<String, Value>, Vec<FieldValidationError>> {
        let Value::Object(mut input) = payload else {
            return Err(self
                .rules
                .iter()
                .map(|rule| FieldValidationError::new(rule.name, "payload must be a JSON object"))
                .collect());
        };

        let mut errors = Vec::new();
        let mut output = Map::new();

        for rule in self.rules {
            match input.remove(rule.name) {
                Some(value) => match rule.check(&value) {
                    Ok(()) => {
                        output.insert(rule.name.to_string(), rule.filter(value));
                    }
                    Err(message) => errors.push(FieldValidationError::new(rule.name, message)),
                },
                None if rule.presence == Presence::Required => {
                    errors.push(FieldValidationError::new(
                        rule.name,
                        format!("'{}' is required", rule.name),
                    ));
                }
                None => {}
            }
        }

        for unknown in input.keys() {
            errors.push(FieldValidationError::new(
                unknown.as_str(),
                format!("'{}' is not allowed", unknown),
            ));
        }

        if errors.is_empty() {
            Ok(output)
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CREATE: RecordSchema = RecordSchema::new(&[
        FieldRule::text("name"),
        FieldRule::blankable_text("text"),
        FieldRule::date("publishedDate"),
    ]);

    const UPDATE: RecordSchema = RecordSchema::new(&[
        FieldRule::text("name").optional(),
        FieldRule::blankable_text("text").optional(),
    ]);

    #[test]
    fn test_valid_payload_is_normalized() {
        let out = CREATE
            .validate_and_filter(json!({
                "name": "A",
                "text": "",
                "publishedDate": "2024-01-01"
            }))
            .unwrap();
        assert_eq!(out["name"], "A");
        assert_eq!(out["text"], "");
        assert_eq!(out["publishedDate"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_missing_required_fields_are_all_reported() {
        let errors = CREATE.validate_and_filter(json!({})).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "text", "publishedDate"]);
        assert!(errors[0].message.contains("required"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let errors = UPDATE
            .validate_and_filter(json!({ "name": "B", "ip": "1.2.3.4" }))
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "ip");
        assert!(errors[0].message.contains("not allowed"));
    }

    #[test]
    fn test_absent_optional_fields_stay_absent() {
        let out = UPDATE.validate_and_filter(json!({ "name": "B" })).unwrap();
        assert_eq!(out.len(), 1);
        assert!(!out.contains_key("text"));
    }

    #[test]
    fn test_empty_update_is_valid() {
        assert!(UPDATE.validate_and_filter(json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_non_object_payload_fails_every_rule() {
        let errors = UPDATE.validate_and_filter(json!([1, 2])).unwrap_err();
        assert_eq!(errors.len(), UPDATE.rules.len());
        let errors = CREATE.validate_and_filter(json!("text")).unwrap_err();
        assert_eq!(errors.len(), CREATE.rules.len());
    }
}
