//! Concierge: free-text recommendations grounded in the stored events.
//!
//! This is a conversational surface, so [`Concierge::ask`] never fails;
//! internal errors are folded into the reply text.

use std::fmt::Write as _;
use std::sync::Arc;

use crate::domain::EventRecord;
use crate::error::GatewayError;
use crate::inference::InferenceClient;
use crate::persistence::EventStore;
use crate::pipeline::ModelFallbackInvoker;

const EMPTY_QUERY_REPLY: &str =
    "Ask me about upcoming events, for example: \"anything chill this weekend?\"";

/// Answers questions about the event catalogue.
#[derive(Debug, Clone)]
pub struct Concierge {
    store: Arc<dyn EventStore>,
    inference: Arc<dyn InferenceClient>,
    invoker: ModelFallbackInvoker,
}

impl Concierge {
    /// Creates a new `Concierge`.
    #[must_use]
    pub fn new(
        store: Arc<dyn EventStore>,
        inference: Arc<dyn InferenceClient>,
        invoker: ModelFallbackInvoker,
    ) -> Self {
        Self {
            store,
            inference,
            invoker,
        }
    }

    /// Returns a reply for `query`.
    pub async fn ask(&self, query: &str) -> String {
        let query = query.trim();
        if query.is_empty() {
            return EMPTY_QUERY_REPLY.to_string();
        }
        match self.recommend(query).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "concierge request failed");
                format!("Sorry, I couldn't come up with a recommendation right now ({e}).")
            }
        }
    }

    async fn recommend(&self, query: &str) -> Result<String, GatewayError> {
        let events = self.store.list_events().await?;
        let prompt = build_prompt(&events, query);
        let inference = self.inference.as_ref();
        let prompt = prompt.as_str();
        let response = self
            .invoker
            .invoke(|model| async move { inference.generate_text(&model, prompt).await })
            .await?;
        Ok(response.text.trim().to_string())
    }
}

/// One line per event: name, venue, date, time and vibe tags.
#[must_use]
pub fn build_context(events: &[EventRecord]) -> String {
    let mut context = String::new();
    for event in events {
        let _ = writeln!(
            context,
            "- {} at {} on {} {} (vibe: {})",
            event.event_name().unwrap_or("Untitled event"),
            event.venue().unwrap_or("unknown venue"),
            event.date().unwrap_or("unknown date"),
            event.time().unwrap_or(""),
            event.vibe().join(", "),
        );
    }
    context
}

fn build_prompt(events: &[EventRecord], query: &str) -> String {
    let context = if events.is_empty() {
        "(no events are listed yet)\n".to_string()
    } else {
        build_context(events)
    };
    format!(
        "You are the Vibe concierge, a friendly local guide to events.\n\
         Recommend from the events below only, in two or three sentences.\n\n\
         Events:\n{context}\n\
         Question: {query}"
    )
}
