//! Service layer: request-level orchestration over the store and pipeline.

pub mod concierge;
pub mod event_service;
pub mod ingest;
pub mod profile_service;
pub mod ticket_service;

pub use concierge::Concierge;
pub use event_service::{EventService, LikeOutcome};
pub use ingest::{FlyerPipeline, FlyerUpload};
pub use profile_service::ProfileService;
pub use ticket_service::{ClaimDetails, TicketService};
