//! Ticket DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{EventId, Ticket};

/// Request body for `POST /api/tickets/claim`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ClaimTicketRequest {
    /// Event being claimed.
    #[schema(value_type = String, format = Uuid)]
    pub event_id: EventId,
    /// Event name to print on the ticket.
    #[serde(default)]
    pub event_name: Option<String>,
    /// Venue to print on the ticket.
    #[serde(default)]
    pub venue: Option<String>,
    /// Date to print on the ticket.
    #[serde(default)]
    pub date: Option<String>,
    /// Identity claiming the ticket.
    #[serde(default)]
    pub user_email: String,
}

/// Response body for `POST /api/tickets/claim`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClaimTicketResponse {
    /// `"Ticket claimed"` or `"Ticket already claimed"`.
    pub message: String,
    /// The ticket on record for this (event, user).
    pub ticket: Ticket,
}
