//! Reqwest-based client for OpenAI-compatible Chat Completions (non-streaming).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::CompletionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub model: String,
    pub temperature: f32,
}

/// A generative completion service: one request, one text block back.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        opts: &ChatOptions,
    ) -> Result<String, CompletionError>;
}

#[derive(Debug)]
pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let timeout = cfg.get_u64("REQUEST_TIMEOUT").unwrap_or(120);
        let api_base_url = cfg
            .get("API_BASE_URL")
            .unwrap_or_else(|| "http://localhost:11434".into());
        let trimmed = api_base_url.trim_end_matches('/');
        let base_url = if !trimmed.ends_with("/v1") && !trimmed.contains("/v1/") {
            format!("{}/v1", trimmed)
        } else {
            trimmed.to_string()
        };
        let api_key = cfg.get("API_KEY").filter(|k| !k.is_empty());

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Self { http, base_url, api_key })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers(&self) -> Result<HeaderMap, CompletionError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.api_key {
            let hv = HeaderValue::from_str(&format!("Bearer {}", key)).map_err(|e| {
                CompletionError::MalformedResponse { raw: format!("invalid api key header: {}", e) }
            })?;
            headers.insert(AUTHORIZATION, hv);
        }
        Ok(headers)
    }

    /// Ids of the models the service reports as installed.
    pub async fn list_models(&self) -> Result<Vec<String>, CompletionError> {
        let url = format!("{}/models", self.base_url);
        let resp = self.http.get(url).headers(self.headers()?).send().await?;
        let status = resp.status();
        let raw = resp.text().await?;
        if !status.is_success() {
            return Err(CompletionError::Status { status: status.as_u16(), body: raw });
        }
        let list: ModelList = serde_json::from_str(&raw)
            .map_err(|_| CompletionError::MalformedResponse { raw })?;
        Ok(list.data.into_iter().map(|m| m.id).collect())
    }
}

#[async_trait]
impl CompletionClient for LlmClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        opts: &ChatOptions,
    ) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = serde_json::json!({
            "model": opts.model,
            "temperature": opts.temperature,
            "messages": messages,
            "stream": false,
        });

        debug!(model = %opts.model, messages = messages.len(), "sending completion request");
        let resp = self
            .http
            .post(url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let raw = resp.text().await?;
        if !status.is_success() {
            return Err(CompletionError::Status { status: status.as_u16(), body: raw });
        }
        parse_completion(&raw)
    }
}

/// Pull the first choice's content out of a raw response body.
pub fn parse_completion(raw: &str) -> Result<String, CompletionError> {
    let malformed = || CompletionError::MalformedResponse { raw: raw.to_string() };
    let parsed: ChatCompletionResponse = serde_json::from_str(raw).map_err(|_| malformed())?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(malformed)
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}
