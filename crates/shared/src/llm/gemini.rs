use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use super::gateway::{GenerationError, GenerationFuture, GenerationGateway};
use crate::config_env::{optional_trimmed_env, parse_u64_env, require_env};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Clone)]
pub struct GeminiGatewayConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_ms: u64,
}

impl GeminiGatewayConfig {
    pub fn from_env() -> Result<Self, GeminiConfigError> {
        let base_url =
            optional_trimmed_env("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(GeminiConfigError::InvalidConfiguration(
                "GEMINI_BASE_URL must start with http:// or https://".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            api_key: require_env("GEMINI_API_KEY").map_err(|_| {
                GeminiConfigError::MissingVar("GEMINI_API_KEY".to_string())
            })?,
            model: optional_trimmed_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout_ms: parse_u64_env("GEMINI_TIMEOUT_MS", DEFAULT_TIMEOUT_MS).map_err(|_| {
                GeminiConfigError::ParseInt("GEMINI_TIMEOUT_MS".to_string())
            })?,
        })
    }
}

#[derive(Debug, Error)]
pub enum GeminiConfigError {
    #[error("missing required env var {0}")]
    MissingVar(String),
    #[error("invalid integer in env var {0}")]
    ParseInt(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed to build Gemini http client: {0}")]
    HttpClient(String),
}

/// Thin wrapper over one Gemini `generateContent` call. Rate-limit signals
/// surface as [`GenerationError::RateLimited`] so the governor can retry;
/// everything else is a provider failure.
#[derive(Clone)]
pub struct GeminiGateway {
    client: reqwest::Client,
    config: GeminiGatewayConfig,
}

impl GeminiGateway {
    pub fn new(config: GeminiGatewayConfig) -> Result<Self, GeminiConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| GeminiConfigError::HttpClient(err.to_string()))?;

        Ok(Self { client, config })
    }

    async fn send_once(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        let request_body = json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ]
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    GenerationError::Timeout
                } else {
                    GenerationError::ProviderFailure("request_unavailable".to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GenerationError::RateLimited);
        }

        let body = response.text().await.map_err(|_| {
            GenerationError::ProviderFailure("response_body_read_failed".to_string())
        })?;

        if !status.is_success() {
            return Err(GenerationError::ProviderFailure(format!(
                "status={}",
                status.as_u16()
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|_| {
            GenerationError::ProviderFailure("response_json_parse_failed".to_string())
        })?;

        let text = parsed
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GenerationError::ProviderFailure(
                "missing_candidate_text".to_string(),
            ));
        }

        Ok(text)
    }
}

impl GenerationGateway for GeminiGateway {
    fn generate<'a>(&'a self, prompt: String) -> GenerationFuture<'a> {
        Box::pin(async move { self.send_once(&prompt).await })
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}
