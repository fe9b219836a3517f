//! Search query builder: single-field payload to substring filter

use regex::Regex;
use serde_json::Value;

use crate::core::error::ValidationError;
use crate::core::store::{Filter, is_field_name};

/// Build a substring filter from a search payload
///
/// Only the first key of the payload, in document order, is honored;
/// further keys are ignored. An empty payload matches every record, and a
/// key that cannot name a record field matches none.
///
/// The value is wrapped as `.*value.*` and compiled unescaped, so plain text
/// matches as a case-sensitive substring while regular expression syntax in
/// the value keeps its meaning.
///
/// # Example
///
/// ```rust,ignore
/// let filter = build_search_filter(&json!({ "name": "Kim" }))?;
/// let page = store.find(&filter, Sort::NewestFirst, 0, PAGE_SIZE).await?;
/// ```
pub fn build_search_filter(payload: &Value) -> Result<Filter, ValidationError> {
    let object = match payload {
        Value::Null => return Ok(Filter::All),
        Value::Object(object) => object,
        _ => {
            return Err(ValidationError::field(
                "payload",
                "search payload must be a JSON object",
            ));
        }
    };

    let Some((field, value)) = object.iter().next() else {
        return Ok(Filter::All);
    };

    if !is_field_name(field) {
        return Ok(Filter::Nothing);
    }

    let needle = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => {
            return Err(ValidationError::field(
                field.as_str(),
                "search value must be a string, number or boolean",
            ));
        }
    };

    let pattern = Regex::new(&format!(".*{}.*", needle)).map_err(|e| {
        ValidationError::field(field.as_str(), format!("invalid search pattern: {}", e))
    })?;

    Ok(Filter::Contains {
        field: field.clone(),
        pattern,
    })
}
