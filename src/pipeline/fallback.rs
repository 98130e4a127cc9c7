//! Ordered model fallback.
//!
//! [`ModelFallbackInvoker`] hides the unavailability of individual models
//! (deprecation, quota, region restriction) behind a single call. Candidates
//! are tried in order, exactly once each; the first success wins and no later
//! candidate is attempted. When every candidate fails, only the last error is
//! reported.

use std::future::Future;
use std::time::Duration;

use crate::error::GatewayError;
use crate::inference::ProviderError;

/// Raw text produced by the first candidate that succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelResponse {
    /// Identifier of the model that answered.
    pub model: String,
    /// Unprocessed response text.
    pub text: String,
}

/// Outcome of one candidate; lives only for the duration of the loop body.
#[derive(Debug)]
struct ExtractionAttempt<'a> {
    model: &'a str,
    outcome: Result<String, ProviderError>,
}

/// Tries an ordered list of model identifiers until one succeeds.
#[derive(Debug, Clone)]
pub struct ModelFallbackInvoker {
    candidates: Vec<String>,
    attempt_timeout: Duration,
}

impl ModelFallbackInvoker {
    /// Creates an invoker over `candidates` (preferred first), bounding each
    /// attempt by `attempt_timeout`.
    #[must_use]
    pub fn new(candidates: Vec<String>, attempt_timeout: Duration) -> Self {
        Self {
            candidates,
            attempt_timeout,
        }
    }

    /// Candidate identifiers in priority order.
    #[must_use]
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Runs `call` for each candidate until one returns text.
    ///
    /// A timeout counts as that candidate's failure. There are no retries
    /// within a candidate.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AllModelsExhausted`] carrying the last
    /// candidate's error (formatted as `"<model>: <error>"`) when every
    /// candidate fails, or when the candidate list is empty.
    pub async fn invoke<F, Fut>(&self, mut call: F) -> Result<ModelResponse, GatewayError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<String, ProviderError>>,
    {
        let mut last_error: Option<String> = None;

        for model in &self.candidates {
            let attempt = ExtractionAttempt {
                model,
                outcome: tokio::time::timeout(self.attempt_timeout, call(model.clone()))
                    .await
                    .unwrap_or_else(|_| Err(ProviderError::Timeout(self.attempt_timeout))),
            };

            match attempt.outcome {
                Ok(text) => {
                    tracing::info!(model = attempt.model, "candidate model succeeded");
                    return Ok(ModelResponse {
                        model: attempt.model.to_string(),
                        text,
                    });
                }
                Err(e) => {
                    tracing::warn!(model = attempt.model, error = %e, "candidate model failed");
                    last_error = Some(format!("{}: {e}", attempt.model));
                }
            }
        }

        Err(GatewayError::AllModelsExhausted {
            last_error: last_error.unwrap_or_else(|| "no candidate models configured".to_string()),
        })
    }
}
