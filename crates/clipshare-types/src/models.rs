use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key namespace shared by every message record in the store.
pub const MESSAGE_KEY_PREFIX: &str = "message:";

pub const FIELD_CONTENT: &str = "content";
pub const FIELD_TIMESTAMP: &str = "timestamp";
pub const FIELD_READABLE_SLUG: &str = "readableSlug";
pub const FIELD_IS_PINNED: &str = "isPinned";

/// A stored paste. `id` and `readable_slug` are both lookup keys; only
/// `is_pinned` changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub content: String,
    /// ISO-8601, millisecond precision, UTC (`2025-01-01T00:00:00.000Z`).
    pub timestamp: String,
    pub readable_slug: String,
    pub is_pinned: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` has invalid value {value:?}")]
    InvalidField { field: &'static str, value: String },
}

impl Message {
    /// Store key for a message id.
    pub fn store_key(id: &str) -> String {
        format!("{MESSAGE_KEY_PREFIX}{id}")
    }

    /// Inverse of [`Message::store_key`]; `None` for keys outside the namespace.
    pub fn id_from_key(key: &str) -> Option<&str> {
        key.strip_prefix(MESSAGE_KEY_PREFIX)
    }

    /// Field map as persisted. The pin flag is written as `"true"` / `"false"`.
    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            (FIELD_CONTENT, self.content.clone()),
            (FIELD_TIMESTAMP, self.timestamp.clone()),
            (FIELD_READABLE_SLUG, self.readable_slug.clone()),
            (FIELD_IS_PINNED, self.is_pinned.to_string()),
        ]
    }

    /// Rebuild a message from its persisted field map.
    pub fn from_fields(id: &str, mut fields: HashMap<String, String>) -> Result<Self, RecordError> {
        let mut take = |name: &'static str| fields.remove(name).ok_or(RecordError::MissingField(name));

        let content = take(FIELD_CONTENT)?;
        let timestamp = take(FIELD_TIMESTAMP)?;
        let readable_slug = take(FIELD_READABLE_SLUG)?;
        let pinned_raw = take(FIELD_IS_PINNED)?;
        let is_pinned = pinned_raw
            .parse::<bool>()
            .map_err(|_| RecordError::InvalidField { field: FIELD_IS_PINNED, value: pinned_raw.clone() })?;

        Ok(Self {
            id: id.to_string(),
            content,
            timestamp,
            readable_slug,
            is_pinned,
        })
    }
}
