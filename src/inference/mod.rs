//! Inference provider seam.
//!
//! [`InferenceClient`] is the one external call the pipeline depends on:
//! "generate content from image + prompt", plus a text-only variant used by
//! the concierge. [`gemini::GeminiClient`] is the production implementation;
//! tests substitute scripted fakes.

pub mod gemini;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

pub use gemini::GeminiClient;

/// Failure of a single provider call.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// No API key was configured at startup.
    #[error("inference API key is not configured")]
    MissingApiKey,

    /// Transport-level failure (DNS, TLS, connection reset, client timeout).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("provider returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Provider error message, or the raw body when it has none.
        message: String,
    },

    /// Provider answered successfully but without any text part.
    #[error("provider returned no text")]
    EmptyResponse,

    /// The attempt exceeded its time budget.
    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),
}

/// Image payload encoded once and reused across candidate attempts.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// MIME type sent alongside the data (e.g. `image/png`).
    pub mime_type: String,
    /// Base64-encoded image bytes.
    pub data_base64: String,
}

impl ImageInput {
    /// Encodes raw image bytes.
    #[must_use]
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            data_base64: BASE64.encode(bytes),
        }
    }
}

/// Hosted multimodal model reachable by a single generate call.
#[async_trait]
pub trait InferenceClient: Send + Sync + fmt::Debug {
    /// Asks `model` to answer `prompt` about `image`, expecting JSON text.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the call fails for any reason.
    async fn generate_from_image(
        &self,
        model: &str,
        image: &ImageInput,
        prompt: &str,
    ) -> Result<String, ProviderError>;

    /// Asks `model` for a free-text answer to `prompt`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the call fails for any reason.
    async fn generate_text(&self, model: &str, prompt: &str) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_input_is_standard_base64() {
        let input = ImageInput::from_bytes("image/png", b"flyer");
        assert_eq!(input.data_base64, "Zmx5ZXI=");
        assert_eq!(input.mime_type, "image/png");
    }
}
