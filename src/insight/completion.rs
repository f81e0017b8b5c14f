use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CompletionConfig;

use super::InsightError;

/// Completion-service collaborator. One outbound call per prompt, no retry;
/// a non-success response surfaces as [`InsightError::Completion`].
#[async_trait]
pub trait CompletionApi: Send + Sync {
    /// Submit a prompt and return the first response message verbatim.
    async fn complete(&self, prompt: &str) -> Result<String, InsightError>;
}

/// OpenAI-compatible chat completion client.
#[derive(Debug)]
pub struct OpenAiClient {
    client: Client,
    config: CompletionConfig,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl OpenAiClient {
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            api_key: std::env::var("OPENAI_API_KEY").ok(),
        }
    }
}

#[async_trait]
impl CompletionApi for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, InsightError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.config.max_tokens,
        };

        let mut request = self.client.post(&self.config.api_url).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            debug!("completion service returned {}: {}", status, detail);
            return Err(InsightError::Completion(format!(
                "completion service returned status {}",
                status
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| InsightError::Completion(format!("malformed completion response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                InsightError::Completion("completion response contained no choices".to_string())
            })
    }
}
