use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ai::config::{AiConfig, GenerationParams};
use crate::error::CapabilityError;

/// External text-generation capability: one instruction in, one free-text reply out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// # Errors
    ///
    /// Returns `CapabilityError` on transport, quota, or empty/blocked replies.
    async fn complete(&self, prompt: &str) -> Result<String, CapabilityError>;
}

/// Shared handle to the capability, or nothing when it is not configured.
///
/// Every AI-backed service holds one; a disabled handle fails fast with
/// `CapabilityError::Disabled` instead of attempting a request.
#[derive(Clone, Default)]
pub struct TextCapability {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl TextCapability {
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self { generator: None }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.generator.is_some()
    }

    /// # Errors
    ///
    /// Returns `CapabilityError::Disabled` when not configured, otherwise whatever
    /// the generator reports.
    pub async fn complete(&self, prompt: &str) -> Result<String, CapabilityError> {
        let generator = self.generator.as_ref().ok_or(CapabilityError::Disabled)?;
        generator.complete(prompt).await
    }
}

impl fmt::Debug for TextCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextCapability")
            .field("enabled", &self.enabled())
            .finish()
    }
}

//
// ─── GEMINI ────────────────────────────────────────────────────────────────────
//

/// `generateContent` client for the Gemini REST API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    config: AiConfig,
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns `CapabilityError::Http` if the HTTP client cannot be built.
    pub fn new(config: AiConfig) -> Result<Self, CapabilityError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, CapabilityError> {
        let payload = GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: self.config.params,
        };

        tracing::debug!(model = %self.config.model, prompt_len = prompt.len(), "requesting completion");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), model = %self.config.model, "completion request rejected");
            return Err(CapabilityError::HttpStatus(response.status()));
        }

        let body: GenerateResponse = response.json().await?;
        body.into_text()
    }
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationParams,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback", default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

impl GenerateResponse {
    /// Joins the text parts of the first candidate.
    fn into_text(self) -> Result<String, CapabilityError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(match self.prompt_feedback.and_then(|f| f.block_reason) {
                Some(reason) => CapabilityError::Blocked(reason),
                None => CapabilityError::EmptyResponse,
            });
        };

        let text: String = candidate
            .content
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(CapabilityError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}
