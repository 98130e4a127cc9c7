//! Builds and persists the event record for one scanned flyer.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::event_record::{ANONYMOUS, RESERVED_KEYS};
use crate::domain::{EventId, EventRecord, ExtractedFields};
use crate::error::GatewayError;
use crate::persistence::EventStore;

/// Merges extracted fields with request metadata and inserts the result.
///
/// Assembly is the last step of ingestion: nothing is written to the store
/// before every earlier stage has succeeded.
#[derive(Debug, Clone)]
pub struct EventAssembler {
    store: Arc<dyn EventStore>,
}

impl EventAssembler {
    /// Creates an assembler writing into `store`.
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Builds the record, stamps the creator's avatar and inserts it.
    ///
    /// A failed profile lookup is logged and the record is stored without
    /// an avatar.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] if the insert fails.
    pub async fn assemble(
        &self,
        fields: ExtractedFields,
        image_url: &str,
        creator: Option<&str>,
    ) -> Result<EventRecord, GatewayError> {
        let mut record = build_record(fields, image_url, creator);

        if record.created_by != ANONYMOUS {
            match self.store.get_profile(&record.created_by).await {
                Ok(profile) => {
                    record.creator_avatar = profile.and_then(|p| p.avatar_url);
                }
                Err(e) => {
                    tracing::warn!(creator = %record.created_by, error = %e, "creator profile lookup failed");
                }
            }
        }

        self.store.insert_event(&record).await?;
        tracing::info!(event_id = %record.id, "event record inserted");
        Ok(record)
    }
}

/// Builds a fresh record without touching the store.
///
/// Reserved keys in `fields` are dropped; the engagement collections always
/// start empty.
#[must_use]
pub fn build_record(fields: ExtractedFields, image_url: &str, creator: Option<&str>) -> EventRecord {
    let mut fields = fields.into_map();
    fields.retain(|key, _| !RESERVED_KEYS.contains(&key.as_str()));

    let created_by = creator
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(ANONYMOUS)
        .to_string();

    EventRecord {
        id: EventId::new(),
        image_url: image_url.to_string(),
        created_by,
        creator_avatar: None,
        likes: Vec::new(),
        checkins: Vec::new(),
        comments: Vec::new(),
        created_at: Some(Utc::now()),
        fields,
    }
}
