//! Reusable field validators
//!
//! Each validator checks one present field value. Presence itself
//! (required vs optional) is decided by the schema before these run.

use serde_json::Value;

/// Validator: value is a string
///
/// The empty string is rejected unless `allow_empty`; `null` is rejected
/// unless `nullable`.
pub fn text(
    allow_empty: bool,
    nullable: bool,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| match value {
        Value::Null if nullable => Ok(()),
        Value::Null => Err(format!("'{}' must not be null", field)),
        Value::String(s) if s.is_empty() && !allow_empty => {
            Err(format!("'{}' is not allowed to be empty", field))
        }
        Value::String(_) => Ok(()),
        _ => Err(format!("'{}' must be a string", field)),
    }
}

/// Validator: value is a date accepted by [`super::filters::parse_date`]
pub fn date() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if super::filters::parse_date(value).is_some() {
            Ok(())
        } else {
            Err(format!("'{}' must be a valid date", field))
        }
    }
}
