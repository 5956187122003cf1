/// Search/LLM provider client.
///
/// The service talks to a Perplexity-style chat-completions backend: it sends
/// one natural-language prompt and gets back one consolidated reply, which is
/// wrapped as a single `RawSearchResult` with the reply text as its snippet.
/// Downstream parsing sniffs that snippet for an embedded JSON array.
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ProviderError;

const MAX_ERROR_BODY_BYTES: usize = 8 * 1024;

/// Minimal search-result unit returned by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Injected collaborator interface for the outbound search/LLM call.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, prompt: &str) -> Result<Vec<RawSearchResult>, ProviderError>;
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct PerplexityClient {
    config: ProviderConfig,
    http: reqwest::Client,
}

impl PerplexityClient {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .user_agent("rental-scout/scout-api")
            .build()?;
        Ok(Self { config, http })
    }

    /// Run a single-turn prompt and return the assistant reply text.
    ///
    /// No retries: a failed or malformed upstream response is terminal for
    /// the current request.
    async fn completion_text(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .json(&request)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(to_upstream_error(resp).await);
        }

        let parsed = resp.json::<ChatCompletionResponse>().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(ProviderError::MissingContent)
    }
}

#[async_trait]
impl SearchProvider for PerplexityClient {
    async fn search(&self, prompt: &str) -> Result<Vec<RawSearchResult>, ProviderError> {
        let reply = self.completion_text(prompt).await?;
        Ok(vec![RawSearchResult {
            title: String::new(),
            url: String::new(),
            snippet: reply,
        }])
    }
}

async fn to_upstream_error(resp: reqwest::Response) -> ProviderError {
    let status = resp.status();
    let body = read_limited_text(resp, MAX_ERROR_BODY_BYTES).await;
    ProviderError::Upstream {
        status,
        message: upstream_message(&body),
    }
}

fn upstream_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body) {
        if let Some(message) = parsed.error.message {
            return message;
        }
    }
    body.to_string()
}

async fn read_limited_text(resp: reqwest::Response, max_bytes: usize) -> String {
    match resp.bytes().await {
        Ok(mut b) => {
            if b.len() > max_bytes {
                b.truncate(max_bytes);
            }
            String::from_utf8_lossy(&b).to_string()
        }
        Err(e) => {
            warn!(error = %e, "failed to read upstream error body");
            "<failed to read error body>".to_string()
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorObject,
}

#[derive(Debug, Deserialize)]
struct ErrorObject {
    message: Option<String>,
    #[allow(dead_code)]
    r#type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}
