//! Free event tickets claimed by users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::EventId;

/// A claimed ticket. At most one exists per (event, user) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Ticket {
    /// Generated ticket code, e.g. `VIBE-3F9A01BC`.
    pub ticket_id: String,
    /// Event the ticket admits to.
    #[schema(value_type = String, format = Uuid)]
    pub event_id: EventId,
    /// Event name copied from the claim request.
    #[serde(default)]
    pub event_name: Option<String>,
    /// Venue copied from the claim request.
    #[serde(default)]
    pub venue: Option<String>,
    /// Event date copied from the claim request.
    #[serde(default)]
    pub date: Option<String>,
    /// Identity holding the ticket.
    pub user_email: String,
    /// Claim time.
    pub claimed_at: DateTime<Utc>,
}

/// Builds a fresh ticket code from a random UUID.
#[must_use]
pub fn generate_ticket_code() -> String {
    let simple = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
    let prefix: String = simple.chars().take(8).collect();
    format!("VIBE-{prefix}")
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn ticket_code_has_prefix_and_eight_hex_chars() {
        let code = generate_ticket_code();
        let Some(suffix) = code.strip_prefix("VIBE-") else {
            panic!("code must carry the VIBE- prefix");
        };
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn ticket_codes_differ() {
        assert_ne!(generate_ticket_code(), generate_ticket_code());
    }
}
