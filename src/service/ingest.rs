//! Flyer pipeline: runs one upload through every ingestion stage.

use std::sync::Arc;

use crate::domain::EventRecord;
use crate::error::GatewayError;
use crate::inference::{ImageInput, InferenceClient};
use crate::pipeline::{
    EventAssembler, ExtractionPrompt, ImageStore, ModelFallbackInvoker, PipelineStage,
    normalize_response,
};

/// A flyer upload as received from the client.
#[derive(Debug, Clone)]
pub struct FlyerUpload {
    /// Client-supplied file name.
    pub file_name: String,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
    /// Creator identity, if supplied.
    pub user_email: Option<String>,
}

/// Orchestrates intake, extraction, normalization and assembly.
///
/// Each call is independent; the pipeline holds only shared handles.
#[derive(Debug, Clone)]
pub struct FlyerPipeline {
    intake: ImageStore,
    inference: Arc<dyn InferenceClient>,
    invoker: ModelFallbackInvoker,
    prompt: ExtractionPrompt,
    assembler: EventAssembler,
}

impl FlyerPipeline {
    /// Wires the stages together.
    #[must_use]
    pub fn new(
        intake: ImageStore,
        inference: Arc<dyn InferenceClient>,
        invoker: ModelFallbackInvoker,
        prompt: ExtractionPrompt,
        assembler: EventAssembler,
    ) -> Self {
        Self {
            intake,
            inference,
            invoker,
            prompt,
            assembler,
        }
    }

    /// Image storage used for flyers.
    #[must_use]
    pub fn image_store(&self) -> &ImageStore {
        &self.intake
    }

    /// Runs the full pipeline for one upload.
    ///
    /// The stored image is left in place when a later stage fails.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Intake`] for a missing or disallowed upload.
    /// - [`GatewayError::AllModelsExhausted`] when every candidate fails.
    /// - [`GatewayError::UnparseableExtraction`] when no JSON object is found.
    /// - [`GatewayError::PersistenceError`] when the insert fails.
    pub async fn ingest(&self, upload: FlyerUpload) -> Result<EventRecord, GatewayError> {
        tracing::debug!(stage = %PipelineStage::Received, file = %upload.file_name, "flyer received");

        let stored = self
            .intake
            .store(&upload.file_name, &upload.bytes)
            .await
            .inspect_err(|e| fail(PipelineStage::Received, e))?;
        tracing::info!(stage = %PipelineStage::Stored, url = %stored.public_url, "flyer stored");

        let image = ImageInput::from_bytes(stored.mime_type(), &upload.bytes);
        let prompt = self.prompt.render();
        tracing::debug!(stage = %PipelineStage::Extracting, candidates = self.invoker.candidates().len(), "extracting");
        let inference = self.inference.as_ref();
        let (image, prompt) = (&image, prompt.as_str());
        let response = self
            .invoker
            .invoke(|model| async move { inference.generate_from_image(&model, image, prompt).await })
            .await
            .inspect_err(|e| fail(PipelineStage::Stored, e))?;

        tracing::debug!(stage = %PipelineStage::Normalizing, model = %response.model, "normalizing");
        let fields =
            normalize_response(&response.text).inspect_err(|e| fail(PipelineStage::Extracting, e))?;

        tracing::debug!(stage = %PipelineStage::Assembling, "assembling");
        let record = self
            .assembler
            .assemble(fields, &stored.public_url, upload.user_email.as_deref())
            .await
            .inspect_err(|e| fail(PipelineStage::Normalizing, e))?;

        tracing::info!(
            stage = %PipelineStage::Persisted,
            event_id = %record.id,
            model = %response.model,
            "flyer ingested"
        );
        Ok(record)
    }
}

/// Logs a failure that ended the request after `last` completed.
fn fail(last: PipelineStage, error: &GatewayError) {
    tracing::warn!(stage = "failed", after = %last, error = %error, "flyer ingestion failed");
}
