//! User (lead) record

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::core::entity::Record;
use crate::core::error::ValidationError;
use crate::core::validation::{FieldRule, Operation, RecordSchema, ValidatableRecord};

/// Schema for `POST /users`
pub const CREATE_SCHEMA: RecordSchema = RecordSchema::new(&[
    FieldRule::text("name"),
    FieldRule::text("hp"),
    FieldRule::text("branch"),
    FieldRule::date("publishedDate"),
]);

/// Schema for `PATCH /users/{id}`
pub const UPDATE_SCHEMA: RecordSchema = RecordSchema::new(&[
    FieldRule::text("name").optional(),
    FieldRule::text("hp").optional(),
    FieldRule::text("branch").optional(),
]);

/// A contact record left through the public sign-up form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    /// Phone number
    pub hp: String,
    pub branch: String,
    /// Origin address, always derived server-side
    pub ip: String,
    pub published_date: DateTime<Utc>,
}

/// A user before the store assigns identity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub name: String,
    pub hp: String,
    pub branch: String,
    pub ip: String,
    pub published_date: DateTime<Utc>,
}

impl UserDraft {
    /// Build a draft from a validated create payload and the caller's address
    pub fn from_payload(mut payload: Map<String, Value>, ip: String) -> Result<Self, ValidationError> {
        payload.insert("ip".to_string(), Value::String(ip));
        Ok(serde_json::from_value(Value::Object(payload))?)
    }
}

impl Record for User {
    type Draft = UserDraft;

    fn collection() -> &'static str {
        "users"
    }

    fn from_draft(id: Uuid, draft: UserDraft) -> Self {
        Self {
            id,
            name: draft.name,
            hp: draft.hp,
            branch: draft.branch,
            ip: draft.ip,
            published_date: draft.published_date,
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "_id" => Some(self.id.to_string()),
            "name" => Some(self.name.clone()),
            "hp" => Some(self.hp.clone()),
            "branch" => Some(self.branch.clone()),
            "ip" => Some(self.ip.clone()),
            "publishedDate" => Some(
                self.published_date
                    .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ),
            _ => None,
        }
    }
}

impl ValidatableRecord for User {
    fn schema(operation: Operation) -> RecordSchema {
        match operation {
            Operation::Create => CREATE_SCHEMA,
            Operation::Update => UPDATE_SCHEMA,
        }
    }
}
