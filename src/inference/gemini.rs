//! Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use super::{ImageInput, InferenceClient, ProviderError};

/// REST client for the Gemini API.
///
/// The key is optional so the gateway can start without credentials; every
/// call then fails with [`ProviderError::MissingApiKey`].
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    api_base: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Creates a client against `api_base` (e.g. the `v1beta` endpoint or a
    /// mock server in tests).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: Option<String>,
        api_base: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("vibe-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_base: api_base.trim().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn endpoint_for_model(&self, model: &str) -> String {
        let trimmed = model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{trimmed}")
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }

    async fn generate(
        &self,
        model: &str,
        parts: Vec<Value>,
        json_output: bool,
    ) -> Result<String, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(ProviderError::MissingApiKey);
        };

        let mut payload = json!({
            "contents": [{ "role": "user", "parts": parts }],
        });
        if json_output && let Some(obj) = payload.as_object_mut() {
            obj.insert(
                "generationConfig".to_string(),
                json!({ "responseMimeType": "application/json" }),
            );
        }

        let response = self
            .http
            .post(self.endpoint_for_model(model))
            .header("x-goog-api-key", api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let body: Value = response.json().await?;
        extract_text(&body).ok_or(ProviderError::EmptyResponse)
    }
}

#[async_trait]
impl InferenceClient for GeminiClient {
    async fn generate_from_image(
        &self,
        model: &str,
        image: &ImageInput,
        prompt: &str,
    ) -> Result<String, ProviderError> {
        let parts = vec![
            json!({
                "inline_data": {
                    "mime_type": image.mime_type,
                    "data": image.data_base64,
                }
            }),
            json!({ "text": prompt }),
        ];
        self.generate(model, parts, true).await
    }

    async fn generate_text(&self, model: &str, prompt: &str) -> Result<String, ProviderError> {
        self.generate(model, vec![json!({ "text": prompt })], false).await
    }
}

/// Concatenates the text parts of the first candidate.
fn extract_text(payload: &Value) -> Option<String> {
    let parts = payload
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Pulls `error.message` out of a Gemini error body, falling back to the
/// (truncated) raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(ToString::to_string)
        })
        .unwrap_or_else(|| body.chars().take(300).collect())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_accepts_bare_and_prefixed_model_names() {
        let Ok(client) =
            GeminiClient::new(None, "https://example.test/v1beta/", Duration::from_secs(1))
        else {
            panic!("client construction failed");
        };
        assert_eq!(
            client.endpoint_for_model("gemini-2.0-flash"),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(
            client.endpoint_for_model("models/gemini-2.0-flash"),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn extract_text_joins_parts_of_first_candidate() {
        let payload = json!({
            "candidates": [
                { "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        });
        assert_eq!(extract_text(&payload), Some("{\"a\":1}".to_string()));
    }

    #[test]
    fn extract_text_without_candidates_is_none() {
        assert_eq!(extract_text(&json!({ "candidates": [] })), None);
        assert_eq!(extract_text(&json!({ "promptFeedback": {} })), None);
    }

    #[test]
    fn error_message_prefers_structured_message() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(error_message(body), "Quota exceeded");
        assert_eq!(error_message("bad gateway"), "bad gateway");
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let Ok(client) = GeminiClient::new(None, "http://127.0.0.1:9", Duration::from_secs(1)) else {
            panic!("client construction failed");
        };
        let result = client.generate_text("gemini-2.0-flash", "hi").await;
        assert!(matches!(result, Err(ProviderError::MissingApiKey)));
    }
}
