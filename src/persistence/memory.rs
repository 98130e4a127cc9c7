//! In-memory document store.
//!
//! Events are kept as raw JSON objects in insertion order so the same
//! backfill-on-read path runs as with the database, and documents from older
//! shapes can be seeded with [`MemoryStore::insert_document`].

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{CommentRemoval, EventStore, decode_events};
use crate::domain::{Comment, EventId, EventRecord, Ticket, UserProfile};
use crate::error::GatewayError;

/// Process-local [`EventStore`].
///
/// Each collection sits behind its own `RwLock`; every trait method takes
/// the lock once, so single-document updates are atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RwLock<Vec<Map<String, Value>>>,
    profiles: RwLock<HashMap<String, UserProfile>>,
    tickets: RwLock<Vec<Ticket>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a raw event document as-is.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] if `doc` is not an object
    /// with a string `_id`.
    pub async fn insert_document(&self, doc: Value) -> Result<(), GatewayError> {
        let Value::Object(map) = doc else {
            return Err(GatewayError::PersistenceError(
                "event document must be a JSON object".to_string(),
            ));
        };
        if !map.get("_id").is_some_and(Value::is_string) {
            return Err(GatewayError::PersistenceError(
                "event document needs a string _id".to_string(),
            ));
        }
        self.events.write().await.push(map);
        Ok(())
    }

    /// Returns the stored document exactly as held, without backfilling.
    pub async fn raw_document(&self, id: EventId) -> Option<Value> {
        let docs = self.events.read().await;
        find(&docs, id).cloned().map(Value::Object)
    }

    /// Number of ticket documents held.
    pub async fn ticket_count(&self) -> usize {
        self.tickets.read().await.len()
    }
}

fn matches_id(doc: &Map<String, Value>, id: EventId) -> bool {
    doc.get("_id").and_then(Value::as_str) == Some(id.to_string().as_str())
}

fn find(docs: &[Map<String, Value>], id: EventId) -> Option<&Map<String, Value>> {
    docs.iter().find(|doc| matches_id(doc, id))
}

fn find_mut(docs: &mut [Map<String, Value>], id: EventId) -> Option<&mut Map<String, Value>> {
    docs.iter_mut().find(|doc| matches_id(doc, id))
}

/// Applies `f` to the array under `key`, treating a missing or non-array
/// value as empty.
fn with_array<R>(
    doc: &mut Map<String, Value>,
    key: &str,
    f: impl FnOnce(&mut Vec<Value>) -> R,
) -> R {
    let mut items = match doc.remove(key) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    let out = f(&mut items);
    doc.insert(key.to_string(), Value::Array(items));
    out
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn insert_event(&self, record: &EventRecord) -> Result<(), GatewayError> {
        let doc = serde_json::to_value(record)?;
        self.insert_document(doc).await
    }

    async fn list_events(&self) -> Result<Vec<EventRecord>, GatewayError> {
        let docs = self.events.read().await;
        Ok(decode_events(
            docs.iter().rev().map(|doc| Value::Object(doc.clone())),
        ))
    }

    async fn get_event(&self, id: EventId) -> Result<Option<EventRecord>, GatewayError> {
        let docs = self.events.read().await;
        match find(&docs, id) {
            Some(doc) => Ok(Some(serde_json::from_value(Value::Object(doc.clone()))?)),
            None => Ok(None),
        }
    }

    async fn update_fields(
        &self,
        id: EventId,
        fields: &Map<String, Value>,
    ) -> Result<bool, GatewayError> {
        let mut docs = self.events.write().await;
        let Some(doc) = find_mut(&mut docs, id) else {
            return Ok(false);
        };
        for (key, value) in fields {
            doc.insert(key.clone(), value.clone());
        }
        Ok(true)
    }

    async fn delete_event(&self, id: EventId) -> Result<bool, GatewayError> {
        let mut docs = self.events.write().await;
        let before = docs.len();
        docs.retain(|doc| !matches_id(doc, id));
        Ok(docs.len() != before)
    }

    async fn set_likes(&self, id: EventId, likes: &[String]) -> Result<bool, GatewayError> {
        let mut docs = self.events.write().await;
        let Some(doc) = find_mut(&mut docs, id) else {
            return Ok(false);
        };
        doc.insert("likes".to_string(), serde_json::to_value(likes)?);
        Ok(true)
    }

    async fn add_checkin(&self, id: EventId, user: &str) -> Result<bool, GatewayError> {
        let mut docs = self.events.write().await;
        let Some(doc) = find_mut(&mut docs, id) else {
            return Ok(false);
        };
        with_array(doc, "checkins", |checkins| {
            if !checkins.iter().any(|v| v.as_str() == Some(user)) {
                checkins.push(Value::String(user.to_string()));
            }
        });
        Ok(true)
    }

    async fn push_comment(&self, id: EventId, comment: &Comment) -> Result<bool, GatewayError> {
        let value = serde_json::to_value(comment)?;
        let mut docs = self.events.write().await;
        let Some(doc) = find_mut(&mut docs, id) else {
            return Ok(false);
        };
        with_array(doc, "comments", |comments| comments.push(value));
        Ok(true)
    }

    async fn pull_comment(
        &self,
        id: EventId,
        comment_id: &str,
    ) -> Result<CommentRemoval, GatewayError> {
        let mut docs = self.events.write().await;
        let Some(doc) = find_mut(&mut docs, id) else {
            return Ok(CommentRemoval::EventMissing);
        };
        let removed = with_array(doc, "comments", |comments| {
            let before = comments.len();
            comments.retain(|c| c.get("id").and_then(Value::as_str) != Some(comment_id));
            comments.len() != before
        });
        if removed {
            Ok(CommentRemoval::Removed)
        } else {
            Ok(CommentRemoval::CommentMissing)
        }
    }

    async fn get_profile(&self, email: &str) -> Result<Option<UserProfile>, GatewayError> {
        Ok(self.profiles.read().await.get(email).cloned())
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), GatewayError> {
        self.profiles
            .write()
            .await
            .insert(profile.email.clone(), profile.clone());
        Ok(())
    }

    async fn claim_ticket(&self, ticket: Ticket) -> Result<Ticket, GatewayError> {
        let mut tickets = self.tickets.write().await;
        if let Some(existing) = tickets
            .iter()
            .find(|t| t.event_id == ticket.event_id && t.user_email == ticket.user_email)
        {
            return Ok(existing.clone());
        }
        tickets.push(ticket.clone());
        Ok(ticket)
    }

    async fn list_tickets(&self, user_email: &str) -> Result<Vec<Ticket>, GatewayError> {
        let tickets = self.tickets.read().await;
        Ok(tickets
            .iter()
            .rev()
            .filter(|t| t.user_email == user_email)
            .cloned()
            .collect())
    }
}
