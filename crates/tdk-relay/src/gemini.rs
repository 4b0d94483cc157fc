//! Generative-language model client.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;
use tdk_core::mask_secret;
use tracing::{debug, warn};

use crate::config::RelayConfig;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("API key not configured (set {0})")]
    MissingApiKey(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("model returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected model response: {0}")]
    Shape(String),

    #[error("model did not answer within {0}s")]
    Timeout(u64),
}

/// Anything that turns a prompt into reply text.
#[async_trait]
pub trait StrategyModel: Send + Sync {
    fn name(&self) -> &str;
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    model: String,
    api_key_env: String,
    api_key: Option<String>,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiClient {
    pub fn from_config(cfg: &RelayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: cfg.api_base.clone(),
            model: cfg.model.clone(),
            api_key_env: cfg.api_key_env.clone(),
            api_key: cfg.api_key.clone(),
            temperature: cfg.temperature,
            max_output_tokens: cfg.max_output_tokens,
        }
    }

    fn endpoint(&self, key: &str) -> Result<Url, ModelError> {
        Url::parse_with_params(
            &format!(
                "{}/v1beta/models/{}:generateContent",
                self.api_base, self.model
            ),
            [("key", key)],
        )
        .map_err(|e| ModelError::Shape(format!("invalid model endpoint: {e}")))
    }
}

#[async_trait]
impl StrategyModel for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ModelError::MissingApiKey(self.api_key_env.clone()))?;
        let url = self.endpoint(key)?;
        debug!(model = %self.model, key = %mask_secret(key), "Calling model");

        let body = json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}],
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": self.max_output_tokens,
            }
        });
        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::Network(e.without_url().to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ModelError::Network(e.without_url().to_string()))?;
        if !status.is_success() {
            warn!(model = %self.model, %status, "Model call failed");
            return Err(ModelError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&text).map_err(|e| ModelError::Shape(e.to_string()))?;
        let reply: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect()
            })
            .unwrap_or_default();
        if reply.is_empty() {
            return Err(ModelError::Shape("no candidate text".to_string()));
        }
        Ok(reply)
    }
}
