//! Gemini generation backend implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use quill_core::{defaults, CompletionBackend, Error, Result};

/// Default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = defaults::GEMINI_BASE_URL;

/// Default generation model.
pub const DEFAULT_GEN_MODEL: &str = defaults::GEN_MODEL;

/// Gemini generation backend.
pub struct GeminiBackend {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl GeminiBackend {
    /// Create a backend with default endpoint and model.
    pub fn new(api_key: String) -> Self {
        Self::with_config(
            DEFAULT_BASE_URL.to_string(),
            api_key,
            DEFAULT_GEN_MODEL.to_string(),
        )
    }

    /// Create a backend with custom configuration.
    pub fn with_config(base_url: String, api_key: String, model: String) -> Self {
        let timeout = std::env::var("QUILL_GEN_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::GEN_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .expect("Failed to create HTTP client");

        info!(base_url = %base_url, model = %model, "Initializing Gemini backend");

        Self {
            client,
            base_url,
            api_key,
            model,
            timeout_secs: timeout,
        }
    }

    /// Create from environment variables.
    ///
    /// Requires `GOOGLE_API_KEY`; honors `GEMINI_BASE_URL` and
    /// `GEMINI_GEN_MODEL` overrides.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config("GOOGLE_API_KEY not set".to_string()))?;
        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model =
            std::env::var("GEMINI_GEN_MODEL").unwrap_or_else(|_| DEFAULT_GEN_MODEL.to_string());

        Ok(Self::with_config(base_url, api_key, model))
    }

    /// Wrap a raw prompt window in the continuation instruction.
    ///
    /// The wording matters: the normalizer strips the matching boilerplate
    /// prefixes the model tends to echo back.
    fn build_prompt(prompt: &str) -> String {
        format!(
            "You are a writing assistant. Continue the following text in a natural, \
             coherent way. Write only 1-2 sentences that flow smoothly from the \
             existing text. Keep the same tone and style:\n\n\"{}\"\n\nContinue writing:",
            prompt
        )
    }
}

/// Classify a provider failure into the error taxonomy.
///
/// Follows the provider's status codes first, then falls back to message
/// sniffing for the structured error strings Gemini embeds in 400 bodies.
fn map_provider_error(status: StatusCode, body: &str) -> Error {
    if status == StatusCode::TOO_MANY_REQUESTS
        || body.contains("QUOTA_EXCEEDED")
        || body.contains("quota")
    {
        return Error::QuotaExceeded(
            "Gemini API quota exceeded. Please check your billing or try again later."
                .to_string(),
        );
    }
    if status == StatusCode::FORBIDDEN || body.contains("PERMISSION_DENIED") {
        return Error::Forbidden(
            "Permission denied. Please enable the Gemini API and check your API key permissions."
                .to_string(),
        );
    }
    if status == StatusCode::UNAUTHORIZED
        || body.contains("API_KEY_INVALID")
        || status == StatusCode::BAD_REQUEST
    {
        return Error::Unauthorized(
            "Invalid Gemini API key. Please check your GOOGLE_API_KEY.".to_string(),
        );
    }
    Error::Inference(format!("Gemini returned {}: {}", status, body))
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[async_trait]
impl CompletionBackend for GeminiBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();
        debug!(prompt_len = prompt.len(), model = %self.model, "Requesting completion");

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Self::build_prompt(prompt),
                }],
            }],
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .client
            .post(url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Gemini request failed");
            return Err(map_provider_error(status, &body));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let text = result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| Error::Inference("Gemini returned no candidates".to_string()))?;

        let cleaned = crate::normalize::normalize_completion(&text);

        debug!(
            response_len = cleaned.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Completion received"
        );
        Ok(cleaned)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
