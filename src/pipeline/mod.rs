//! Flyer ingestion pipeline.
//!
//! ```text
//! upload ─▶ intake ─▶ fallback (prompt + model candidates) ─▶ normalizer ─▶ assembler ─▶ store
//! ```
//!
//! Each stage is usable on its own; [`crate::service::FlyerPipeline`] wires
//! them together for one request.

pub mod assembler;
pub mod fallback;
pub mod intake;
pub mod normalizer;
pub mod prompt;
pub mod stage;

pub use assembler::EventAssembler;
pub use fallback::{ModelFallbackInvoker, ModelResponse};
pub use intake::{ImageStore, StoredImage};
pub use normalizer::normalize_response;
pub use prompt::ExtractionPrompt;
pub use stage::PipelineStage;
