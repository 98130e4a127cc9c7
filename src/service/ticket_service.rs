//! Ticket service: free ticket claims.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::ticket::generate_ticket_code;
use crate::domain::{EventId, Ticket};
use crate::error::GatewayError;
use crate::persistence::EventStore;

/// Details copied onto a ticket at claim time.
#[derive(Debug, Clone, Default)]
pub struct ClaimDetails {
    /// Event name shown on the ticket.
    pub event_name: Option<String>,
    /// Venue shown on the ticket.
    pub venue: Option<String>,
    /// Date shown on the ticket.
    pub date: Option<String>,
}

/// Issues at most one ticket per (event, user).
#[derive(Debug, Clone)]
pub struct TicketService {
    store: Arc<dyn EventStore>,
}

impl TicketService {
    /// Creates a new `TicketService`.
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Claims a ticket. Returns the ticket on record and whether it was
    /// issued by this call.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] if `user_email` is blank.
    /// - [`GatewayError::PersistenceError`] on store failure.
    pub async fn claim(
        &self,
        event_id: EventId,
        user_email: &str,
        details: ClaimDetails,
    ) -> Result<(Ticket, bool), GatewayError> {
        let user_email = user_email.trim();
        if user_email.is_empty() {
            return Err(GatewayError::Validation("user_email is required".to_string()));
        }

        let candidate = Ticket {
            ticket_id: generate_ticket_code(),
            event_id,
            event_name: details.event_name,
            venue: details.venue,
            date: details.date,
            user_email: user_email.to_string(),
            claimed_at: Utc::now(),
        };
        let issued_code = candidate.ticket_id.clone();
        let ticket = self.store.claim_ticket(candidate).await?;
        let issued = ticket.ticket_id == issued_code;
        if issued {
            tracing::info!(event_id = %event_id, ticket_id = %ticket.ticket_id, "ticket issued");
        }
        Ok((ticket, issued))
    }

    /// Tickets held by `user_email`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    pub async fn list(&self, user_email: &str) -> Result<Vec<Ticket>, GatewayError> {
        self.store.list_tickets(user_email).await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[tokio::test]
    async fn second_claim_returns_the_same_ticket() {
        let store = Arc::new(MemoryStore::new());
        let service = TicketService::new(Arc::<MemoryStore>::clone(&store));
        let event_id = EventId::new();

        let Ok((first, issued_first)) = service
            .claim(event_id, "ana@example.com", ClaimDetails::default())
            .await
        else {
            panic!("first claim should succeed");
        };
        let Ok((second, issued_second)) = service
            .claim(event_id, "ana@example.com", ClaimDetails::default())
            .await
        else {
            panic!("second claim should succeed");
        };

        assert!(issued_first);
        assert!(!issued_second);
        assert_eq!(first.ticket_id, second.ticket_id);
        assert_eq!(store.ticket_count().await, 1);
    }

    #[tokio::test]
    async fn list_only_returns_own_tickets() {
        let service = TicketService::new(Arc::new(MemoryStore::new()));
        let _ = service
            .claim(EventId::new(), "ana@example.com", ClaimDetails::default())
            .await;
        let _ = service
            .claim(EventId::new(), "bo@example.com", ClaimDetails::default())
            .await;

        let Ok(tickets) = service.list("ana@example.com").await else {
            panic!("list should succeed");
        };
        assert_eq!(tickets.len(), 1);
        assert!(tickets.iter().all(|t| t.user_email == "ana@example.com"));
    }
}
