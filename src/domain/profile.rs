//! User profile documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Profile keyed by email, holding the current avatar reference.
///
/// Read when stamping creator and commenter avatars. Later avatar changes
/// never rewrite already-stamped events or comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    /// Identity of the profile owner.
    pub email: String,
    /// Public reference to the avatar image, if one was uploaded.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Time of the last avatar upsert.
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Creates a profile stamped at the current time.
    #[must_use]
    pub fn new(email: String, avatar_url: Option<String>) -> Self {
        Self {
            email,
            avatar_url,
            updated_at: Utc::now(),
        }
    }
}
