//! Per-request ingestion states, recorded on log lines as `stage`.

use std::fmt;

/// Where an ingestion request is in the pipeline.
///
/// `Received → Stored → Extracting → Normalizing → Assembling → Persisted`.
/// Any stage before `Assembling` may end the request instead; no record is
/// written until `Persisted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Upload accepted by the handler.
    Received,
    /// Image written to storage.
    Stored,
    /// Candidate models are being tried.
    Extracting,
    /// Raw model text is being parsed.
    Normalizing,
    /// Record is being built and inserted.
    Assembling,
    /// Record is in the store.
    Persisted,
}

impl PipelineStage {
    /// Stable lower-case name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Stored => "stored",
            Self::Extracting => "extracting",
            Self::Normalizing => "normalizing",
            Self::Assembling => "assembling",
            Self::Persisted => "persisted",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
