//! Persisted event documents and their embedded comments.
//!
//! An [`EventRecord`] is a loosely-typed document: whatever keys the model
//! extracted from the flyer are kept verbatim in [`EventRecord::fields`],
//! while the keys the server owns (identity, image, creator, engagement)
//! are typed struct fields. Deserialization is the store-reading boundary:
//! documents written before the engagement collections existed come back
//! with `likes`, `checkins` and `comments` backfilled to empty, whether the
//! key is absent or holds `null`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::EventId;

/// Creator identity used when the client does not supply one.
pub const ANONYMOUS: &str = "Anonymous";

/// Keys the assembler owns. Extracted values under these keys are dropped.
pub const RESERVED_KEYS: [&str; 8] = [
    "_id",
    "image_url",
    "created_by",
    "creator_avatar",
    "likes",
    "checkins",
    "comments",
    "created_at",
];

/// Fields a client may change through `PUT /api/events/{id}`.
///
/// `vibe` is deliberately absent: tags are fixed once extracted.
pub const EDITABLE_FIELDS: [&str; 5] = ["event_name", "venue", "date", "time", "ticket_link"];

/// Structured fields returned by the model for one flyer.
///
/// Every key is best-effort. The expected keys are `event_name`, `venue`,
/// `date` (`YYYY-MM-DD`), `time` and `vibe` (up to three short tags), but
/// any of them may be missing or carry an unexpected JSON type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedFields(Map<String, Value>);

impl ExtractedFields {
    /// Wraps an already-parsed JSON object.
    #[must_use]
    pub const fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the wrapper and returns the JSON object.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Extracted event name, if present and a string.
    #[must_use]
    pub fn event_name(&self) -> Option<&str> {
        str_field(&self.0, "event_name")
    }

    /// Extracted venue, if present and a string.
    #[must_use]
    pub fn venue(&self) -> Option<&str> {
        str_field(&self.0, "venue")
    }

    /// Extracted date, if present and a string. Not validated.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        str_field(&self.0, "date")
    }

    /// String entries of the extracted `vibe` array, in order.
    #[must_use]
    pub fn vibe(&self) -> Vec<&str> {
        vibe_tags(&self.0)
    }
}

/// A comment embedded in an event document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    /// Generated identifier (UUID v4 string), used for removal.
    pub id: String,
    /// Author identity as supplied by the client.
    pub user: String,
    /// Comment body. Never empty.
    pub text: String,
    /// Author avatar at the time of posting.
    #[serde(default)]
    pub user_avatar: Option<String>,
    /// Posting time.
    pub timestamp: DateTime<Utc>,
}

impl Comment {
    /// Creates a comment with a fresh identifier stamped at the current time.
    #[must_use]
    pub fn new(user: String, text: String, user_avatar: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user,
            text,
            user_avatar,
            timestamp: Utc::now(),
        }
    }
}

/// Persisted event document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Store-assigned identifier, exposed on the wire as `_id`.
    #[serde(rename = "_id")]
    pub id: EventId,

    /// Public reference to the stored flyer image.
    #[serde(default)]
    pub image_url: String,

    /// Creator identity, `"Anonymous"` when unspecified.
    #[serde(default = "anonymous", deserialize_with = "null_as_anonymous")]
    pub created_by: String,

    /// Creator avatar copied from their profile at creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_avatar: Option<String>,

    /// Identities that liked the event (set semantics).
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: Vec<String>,

    /// Identities checked in to the event (set semantics).
    #[serde(default, deserialize_with = "null_as_default")]
    pub checkins: Vec<String>,

    /// Comments in posting order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Vec<Comment>,

    /// Creation time. Absent on documents from early drafts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Extracted keys plus client-edited ones such as `ticket_link`.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl EventRecord {
    /// Event name, if present and a string.
    #[must_use]
    pub fn event_name(&self) -> Option<&str> {
        str_field(&self.fields, "event_name")
    }

    /// Venue, if present and a string.
    #[must_use]
    pub fn venue(&self) -> Option<&str> {
        str_field(&self.fields, "venue")
    }

    /// Date as stored, if present and a string.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        str_field(&self.fields, "date")
    }

    /// Time as stored, if present and a string.
    #[must_use]
    pub fn time(&self) -> Option<&str> {
        str_field(&self.fields, "time")
    }

    /// Vibe tags in order.
    #[must_use]
    pub fn vibe(&self) -> Vec<&str> {
        vibe_tags(&self.fields)
    }

    /// Ticket purchase link, if one was added.
    #[must_use]
    pub fn ticket_link(&self) -> Option<&str> {
        str_field(&self.fields, "ticket_link")
    }
}

fn anonymous() -> String {
    ANONYMOUS.to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_anonymous<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(anonymous))
}

fn str_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

fn vibe_tags(map: &Map<String, Value>) -> Vec<&str> {
    map.get("vibe")
        .and_then(Value::as_array)
        .map(|tags| tags.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}
