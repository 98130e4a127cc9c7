//! Event service: listing, edits and engagement on stored events.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::domain::event_record::{ANONYMOUS, EDITABLE_FIELDS};
use crate::domain::{Comment, EventId, EventRecord};
use crate::error::GatewayError;
use crate::persistence::{CommentRemoval, EventStore};

/// Result of a like toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeOutcome {
    /// Whether the identity likes the event after the toggle.
    pub liked: bool,
    /// The likes collection after the toggle.
    pub likes: Vec<String>,
}

/// Thin coordinator over the [`EventStore`] for everything after ingestion.
///
/// Check-ins, comment appends and comment removals are single store
/// operations. The like toggle is a read followed by a replace, so two
/// concurrent toggles resolve as last write wins.
#[derive(Debug, Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
}

impl EventService {
    /// Creates a new `EventService`.
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Returns all events, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    pub async fn list(&self) -> Result<Vec<EventRecord>, GatewayError> {
        self.store.list_events().await
    }

    /// Fetches one event.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] if the event does not exist.
    pub async fn get(&self, id: EventId) -> Result<EventRecord, GatewayError> {
        self.store
            .get_event(id)
            .await?
            .ok_or_else(|| GatewayError::EventNotFound(id.to_string()))
    }

    /// Applies the allow-listed keys of `changes` and returns the updated
    /// event. Keys outside the allow-list are ignored.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] if no submitted key is editable; the
    ///   store is not touched.
    /// - [`GatewayError::EventNotFound`] if the event does not exist.
    pub async fn update(
        &self,
        id: EventId,
        changes: Map<String, Value>,
    ) -> Result<EventRecord, GatewayError> {
        let allowed: Map<String, Value> = changes
            .into_iter()
            .filter(|(key, _)| EDITABLE_FIELDS.contains(&key.as_str()))
            .collect();
        if allowed.is_empty() {
            return Err(GatewayError::Validation(format!(
                "no editable fields supplied; allowed: {}",
                EDITABLE_FIELDS.join(", ")
            )));
        }

        if !self.store.update_fields(id, &allowed).await? {
            return Err(GatewayError::EventNotFound(id.to_string()));
        }
        tracing::info!(event_id = %id, fields = allowed.len(), "event updated");
        self.get(id).await
    }

    /// Deletes an event. Its flyer image stays on disk.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] if the event does not exist.
    pub async fn delete(&self, id: EventId) -> Result<(), GatewayError> {
        if !self.store.delete_event(id).await? {
            return Err(GatewayError::EventNotFound(id.to_string()));
        }
        tracing::info!(event_id = %id, "event deleted");
        Ok(())
    }

    /// Adds `user` to the likes if absent, removes it otherwise.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] if `user` is blank.
    /// - [`GatewayError::EventNotFound`] if the event does not exist.
    pub async fn toggle_like(&self, id: EventId, user: &str) -> Result<LikeOutcome, GatewayError> {
        let user = required_identity(user)?;
        let mut likes = self.get(id).await?.likes;

        let liked = if let Some(pos) = likes.iter().position(|u| u == user) {
            likes.remove(pos);
            false
        } else {
            likes.push(user.to_string());
            true
        };

        if !self.store.set_likes(id, &likes).await? {
            return Err(GatewayError::EventNotFound(id.to_string()));
        }
        Ok(LikeOutcome { liked, likes })
    }

    /// Marks `user` as checked in. Repeating it changes nothing.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] if `user` is blank.
    /// - [`GatewayError::EventNotFound`] if the event does not exist.
    pub async fn check_in(&self, id: EventId, user: &str) -> Result<Vec<String>, GatewayError> {
        let user = required_identity(user)?;
        if !self.store.add_checkin(id, user).await? {
            return Err(GatewayError::EventNotFound(id.to_string()));
        }
        Ok(self.get(id).await?.checkins)
    }

    /// Appends a comment, stamping the author's current avatar.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] if `text` is empty after trimming.
    /// - [`GatewayError::EventNotFound`] if the event does not exist.
    pub async fn add_comment(
        &self,
        id: EventId,
        user: &str,
        text: &str,
    ) -> Result<Comment, GatewayError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(GatewayError::Validation(
                "comment text must not be empty".to_string(),
            ));
        }
        let user = match user.trim() {
            "" => ANONYMOUS,
            u => u,
        };

        let avatar = match self.store.get_profile(user).await {
            Ok(profile) => profile.and_then(|p| p.avatar_url),
            Err(e) => {
                tracing::warn!(user, error = %e, "commenter profile lookup failed");
                None
            }
        };

        let comment = Comment::new(user.to_string(), text.to_string(), avatar);
        if !self.store.push_comment(id, &comment).await? {
            return Err(GatewayError::EventNotFound(id.to_string()));
        }
        tracing::debug!(event_id = %id, comment_id = %comment.id, "comment added");
        Ok(comment)
    }

    /// Removes a comment by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] or
    /// [`GatewayError::CommentNotFound`] when either is absent.
    pub async fn remove_comment(&self, id: EventId, comment_id: &str) -> Result<(), GatewayError> {
        match self.store.pull_comment(id, comment_id).await? {
            CommentRemoval::Removed => Ok(()),
            CommentRemoval::EventMissing => Err(GatewayError::EventNotFound(id.to_string())),
            CommentRemoval::CommentMissing => {
                Err(GatewayError::CommentNotFound(comment_id.to_string()))
            }
        }
    }
}

fn required_identity(user: &str) -> Result<&str, GatewayError> {
    let user = user.trim();
    if user.is_empty() {
        Err(GatewayError::Validation("user identity is required".to_string()))
    } else {
        Ok(user)
    }
}
