use std::borrow::Cow;

use chrono::{DateTime, Utc};
use schemars::{json_schema, JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};

pub type NoteId = i64;

pub const TITLE_MAX_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Note {
    /// Unique identifier for the note
    pub id: NoteId,
    /// Title of the note
    pub title: String,
    /// Content/body of the note
    pub content: String,
    /// Timestamp when the note was created (UTC)
    pub created_at: DateTime<Utc>,
    /// Timestamp when the note was last updated (UTC)
    pub updated_at: DateTime<Utc>,
}

/// Note title, 1 to 200 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TitleError {
    #[error("title must not be empty")]
    Empty,
    #[error("title must be at most {} characters", TITLE_MAX_CHARS)]
    TooLong,
}

impl TryFrom<String> for Title {
    type Error = TitleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(TitleError::Empty);
        }
        if value.chars().count() > TITLE_MAX_CHARS {
            return Err(TitleError::TooLong);
        }
        Ok(Self(value))
    }
}

impl From<Title> for String {
    fn from(title: Title) -> Self {
        title.0
    }
}

impl JsonSchema for Title {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("Title")
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "minLength": 1,
            "maxLength": TITLE_MAX_CHARS,
            "description": "Title of the note",
        })
    }
}

/// Payload for creating a note and for replacing one entirely.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateNote {
    pub title: Title,
    /// Content/body of the note
    pub content: String,
}

/// Partial update, absent fields keep their current value.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct UpdateNote {
    pub title: Option<Title>,
    /// Updated content/body of the note
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_bounds() {
        assert_eq!(Title::try_from(String::new()), Err(TitleError::Empty));
        assert!(Title::try_from("a".to_string()).is_ok());
        assert!(Title::try_from("a".repeat(TITLE_MAX_CHARS)).is_ok());
        assert_eq!(Title::try_from("a".repeat(TITLE_MAX_CHARS + 1)), Err(TitleError::TooLong));
    }

    #[test]
    fn title_length_counts_characters_not_bytes() {
        let title = Title::try_from("é".repeat(TITLE_MAX_CHARS)).unwrap();
        assert_eq!(String::from(title).chars().count(), TITLE_MAX_CHARS);
    }

    #[test]
    fn payloads_reject_invalid_titles() {
        let error = serde_json::from_str::<CreateNote>(r#"{"title": "", "content": ""}"#).unwrap_err();
        assert!(error.to_string().contains("title must not be empty"));

        let update = serde_json::from_str::<UpdateNote>(r#"{"content": "x", "extra": 1}"#).unwrap();
        assert!(update.title.is_none());
        assert_eq!(update.content.as_deref(), Some("x"));

        let update = serde_json::from_str::<UpdateNote>(r#"{"title": null}"#).unwrap();
        assert!(update.title.is_none());
    }

    #[test]
    fn title_schema_carries_length_bounds() {
        let schema = schemars::schema_for!(Title);

        assert_eq!(schema.get("minLength"), Some(&serde_json::json!(1)));
        assert_eq!(schema.get("maxLength"), Some(&serde_json::json!(TITLE_MAX_CHARS)));
    }
}
