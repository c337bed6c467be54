use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use verdant_core::config::GenerationConfig;

use crate::llm::{BridgeError, LlmClient};

/// Gemini `generateContent` client. Constructed once at bootstrap and
/// shared by reference; the request timeout lives on the inner
/// `reqwest::Client`, so a stalled provider call fails as `Upstream`
/// instead of hanging a request.
pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    pub fn from_config(config: &GenerationConfig) -> Result<Self, BridgeError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| BridgeError::Upstream("generation.api_key is not configured".to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| BridgeError::Upstream(error.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, BridgeError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|error| BridgeError::Upstream(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(BridgeError::Upstream(format!(
                "generation endpoint returned {status}: {detail}"
            )));
        }

        let payload: GenerateContentResponse =
            response.json().await.map_err(|error| BridgeError::Upstream(error.to_string()))?;

        let text = payload
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate.content.parts.into_iter().map(|part| part.text).collect::<String>()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(BridgeError::Upstream("generation response held no candidates".to_string()));
        }

        Ok(text)
    }
}
