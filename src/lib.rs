//! # vibe-gateway
//!
//! REST backend for Project Vibe: scan an event flyer, extract its details
//! with a hosted multimodal model, and serve the resulting events with likes,
//! check-ins, comments, avatars, free tickets and a recommendation endpoint.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── Services (service/)
//!     │     └── FlyerPipeline ── intake ─▶ fallback ─▶ normalizer ─▶ assembler (pipeline/)
//!     │                                       │
//!     │                                       └── Gemini client (inference/)
//!     │
//!     └── EventStore (persistence/): PostgreSQL JSONB or in-memory
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod inference;
pub mod persistence;
pub mod pipeline;
pub mod service;
