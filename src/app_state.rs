//! Shared application state injected into all Axum handlers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::GatewayConfig;
use crate::inference::InferenceClient;
use crate::persistence::EventStore;
use crate::pipeline::{EventAssembler, ExtractionPrompt, ImageStore, ModelFallbackInvoker};
use crate::service::{Concierge, EventService, FlyerPipeline, ProfileService, TicketService};

/// The subset of [`GatewayConfig`] the services need.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Directory for flyer uploads, served at `/uploads`.
    pub upload_dir: PathBuf,
    /// Directory for avatars, served at `/profiles`.
    pub profile_dir: PathBuf,
    /// Candidate models, preferred first.
    pub model_candidates: Vec<String>,
    /// Bound on each candidate attempt.
    pub model_attempt_timeout: Duration,
    /// Replacement extraction directive, if configured.
    pub extraction_prompt: Option<String>,
}

impl From<&GatewayConfig> for ServiceSettings {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            upload_dir: config.upload_dir.clone(),
            profile_dir: config.profile_dir.clone(),
            model_candidates: config.model_candidates.clone(),
            model_attempt_timeout: config.model_attempt_timeout(),
            extraction_prompt: config.extraction_prompt.clone(),
        }
    }
}

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
///
/// Built explicitly at startup (or per test) from a store and an inference
/// client; there are no process-wide handles.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Flyer ingestion pipeline.
    pub pipeline: Arc<FlyerPipeline>,
    /// Event edits and engagement.
    pub events: Arc<EventService>,
    /// Avatar uploads and lookups.
    pub profiles: Arc<ProfileService>,
    /// Ticket claims.
    pub tickets: Arc<TicketService>,
    /// Recommendation endpoint.
    pub concierge: Arc<Concierge>,
}

impl AppState {
    /// Wires every service over `store` and `inference`.
    #[must_use]
    pub fn new(
        store: Arc<dyn EventStore>,
        inference: Arc<dyn InferenceClient>,
        settings: &ServiceSettings,
    ) -> Self {
        let invoker = ModelFallbackInvoker::new(
            settings.model_candidates.clone(),
            settings.model_attempt_timeout,
        );

        let pipeline = FlyerPipeline::new(
            ImageStore::new(&settings.upload_dir, "/uploads"),
            Arc::clone(&inference),
            invoker.clone(),
            ExtractionPrompt::new(settings.extraction_prompt.clone()),
            EventAssembler::new(Arc::clone(&store)),
        );

        Self {
            pipeline: Arc::new(pipeline),
            events: Arc::new(EventService::new(Arc::clone(&store))),
            profiles: Arc::new(ProfileService::new(
                Arc::clone(&store),
                ImageStore::new(&settings.profile_dir, "/profiles"),
            )),
            tickets: Arc::new(TicketService::new(Arc::clone(&store))),
            concierge: Arc::new(Concierge::new(store, inference, invoker)),
        }
    }
}
