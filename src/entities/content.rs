//! Content (promotional banner) record

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::core::entity::Record;
use crate::core::error::ValidationError;
use crate::core::validation::{FieldRule, Operation, RecordSchema, ValidatableRecord};

/// Schema for `POST /content`
pub const CREATE_SCHEMA: RecordSchema = RecordSchema::new(&[
    FieldRule::blankable_text("imageUrlPc"),
    FieldRule::blankable_text("imageUrlMo"),
    FieldRule::blankable_text("text"),
    FieldRule::date("publishedDate"),
]);

/// Schema for `PATCH /content/{id}`
///
/// Unlike create, the text fields may not be blanked here, and
/// `publishedDate` must accompany every update.
pub const UPDATE_SCHEMA: RecordSchema = RecordSchema::new(&[
    FieldRule::text("imageUrlPc").optional(),
    FieldRule::text("imageUrlMo").optional(),
    FieldRule::text("text").optional(),
    FieldRule::date("publishedDate"),
]);

/// The banner shown on the landing page
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Desktop image URL
    pub image_url_pc: Option<String>,
    /// Mobile image URL
    pub image_url_mo: Option<String>,
    pub text: Option<String>,
    pub published_date: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDraft {
    pub image_url_pc: Option<String>,
    pub image_url_mo: Option<String>,
    pub text: Option<String>,
    pub published_date: DateTime<Utc>,
}

impl ContentDraft {
    pub fn from_payload(payload: Map<String, Value>) -> Result<Self, ValidationError> {
        Ok(serde_json::from_value(Value::Object(payload))?)
    }
}

impl Record for Content {
    type Draft = ContentDraft;

    fn collection() -> &'static str {
        "content"
    }

    fn from_draft(id: Uuid, draft: ContentDraft) -> Self {
        Self {
            id,
            image_url_pc: draft.image_url_pc,
            image_url_mo: draft.image_url_mo,
            text: draft.text,
            published_date: draft.published_date,
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "_id" => Some(self.id.to_string()),
            "imageUrlPc" => self.image_url_pc.clone(),
            "imageUrlMo" => self.image_url_mo.clone(),
            "text" => self.text.clone(),
            "publishedDate" => Some(
                self.published_date
                    .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ),
            _ => None,
        }
    }
}

impl ValidatableRecord for Content {
    fn schema(operation: Operation) -> RecordSchema {
        match operation {
            Operation::Create => CREATE_SCHEMA,
            Operation::Update => UPDATE_SCHEMA,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_accepts_blank_and_null_text() {
        let payload = CREATE_SCHEMA
            .validate_and_filter(json!({
                "imageUrlPc": "",
                "imageUrlMo": null,
                "text": "",
                "publishedDate": "2024-05-01"
            }))
            .unwrap();
        let draft = ContentDraft::from_payload(payload).unwrap();
        assert_eq!(draft.image_url_pc.as_deref(), Some(""));
        assert_eq!(draft.image_url_mo, None);
    }

    #[test]
    fn test_create_requires_every_field() {
        let errors = CREATE_SCHEMA
            .validate_and_filter(json!({ "text": "hello" }))
            .unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["imageUrlPc", "imageUrlMo", "publishedDate"]);
    }

    #[test]
    fn test_update_requires_published_date() {
        let errors = UPDATE_SCHEMA
            .validate_and_filter(json!({ "text": "new" }))
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "publishedDate");
    }

    #[test]
    fn test_update_rejects_blank_text() {
        let errors = UPDATE_SCHEMA
            .validate_and_filter(json!({ "text": "", "publishedDate": "2024-05-01" }))
            .unwrap_err();
        assert_eq!(errors[0].field, "text");
    }
}
