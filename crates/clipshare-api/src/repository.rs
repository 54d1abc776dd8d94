use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use clipshare_db::StoreClient;
use clipshare_types::models::{FIELD_IS_PINNED, MESSAGE_KEY_PREFIX, Message};

use crate::error::ApiError;
use crate::ids::{format_timestamp, generate_message_id, generate_slug, parse_timestamp};

/// Create/list/pin/delete over the `message:<id>` namespace. Every call
/// reads the store afresh; nothing is cached here.
pub struct MessageRepository {
    store: Arc<StoreClient>,
}

impl MessageRepository {
    pub fn new(store: Arc<StoreClient>) -> Self {
        Self { store }
    }

    pub fn create(&self, content: &str) -> Result<Message, ApiError> {
        self.create_at(content, Utc::now())
    }

    /// Create with an explicit creation instant. Re-submitting identical
    /// content at the same instant lands on the same id and overwrites it.
    pub fn create_at(&self, content: &str, now: DateTime<Utc>) -> Result<Message, ApiError> {
        if content.is_empty() {
            return Err(ApiError::Validation("Content required".into()));
        }

        let timestamp = format_timestamp(now);
        let message = Message {
            id: generate_message_id(content, &timestamp),
            content: content.to_string(),
            timestamp,
            readable_slug: generate_slug(),
            is_pinned: false,
        };

        let db = self.store.connect()?;
        db.hset(&Message::store_key(&message.id), &message.to_fields())?;

        info!("Message {} created ({}, {} bytes)", message.id, message.readable_slug, message.content.len());
        Ok(message)
    }

    /// All messages, newest first. Equal timestamps fall back to id order so
    /// the result is stable between calls.
    pub fn list(&self) -> Result<Vec<Message>, ApiError> {
        let db = self.store.connect()?;
        let keys = db.keys_with_prefix(MESSAGE_KEY_PREFIX)?;

        let mut messages = Vec::with_capacity(keys.len());
        for key in &keys {
            let Some(id) = Message::id_from_key(key) else { continue };
            let fields = db.hgetall(key)?;
            if fields.is_empty() {
                // deleted between the key scan and the read
                continue;
            }
            match Message::from_fields(id, fields) {
                Ok(message) => messages.push(message),
                Err(e) => warn!("Skipping corrupt record '{}': {}", key, e),
            }
        }

        messages.sort_by(|a, b| {
            parse_timestamp(&b.timestamp)
                .cmp(&parse_timestamp(&a.timestamp))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(messages)
    }

    /// Update the pin flag. Returns false when no message has this id; the
    /// store is left untouched in that case.
    pub fn set_pinned(&self, id: &str, is_pinned: bool) -> Result<bool, ApiError> {
        let db = self.store.connect()?;
        let updated = db.hset_existing(&Message::store_key(id), FIELD_IS_PINNED, &is_pinned.to_string())?;
        if updated {
            debug!("Message {} pinned={}", id, is_pinned);
        } else {
            debug!("Pin update for unknown message {} ignored", id);
        }
        Ok(updated)
    }

    /// Delete one message, or every message when `id` is `None`.
    /// Returns how many records were removed; an unknown id removes none.
    pub fn delete(&self, id: Option<&str>) -> Result<usize, ApiError> {
        let db = self.store.connect()?;
        let removed = match id {
            Some(id) => db.del(&[Message::store_key(id)])?,
            None => {
                let keys = db.keys_with_prefix(MESSAGE_KEY_PREFIX)?;
                let removed = db.del(&keys)?;
                info!("Cleared all messages ({} removed)", removed);
                removed
            }
        };
        if removed == 0 {
            debug!("Delete of {:?} matched nothing", id);
        }
        Ok(removed)
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<Message>, ApiError> {
        Ok(self.list()?.into_iter().find(|m| m.id == id))
    }

    /// Slugs are not unique; the newest message carrying the slug wins.
    pub fn find_by_slug(&self, slug: &str) -> Result<Option<Message>, ApiError> {
        let mut matches = self.list()?.into_iter().filter(|m| m.readable_slug == slug);
        let first = matches.next();
        let others = matches.count();
        if others > 0 {
            debug!("Slug '{}' shared by {} messages, resolving to the newest", slug, others + 1);
        }
        Ok(first)
    }
}
