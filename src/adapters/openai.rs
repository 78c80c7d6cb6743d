use crate::domain::ports::TextGenerator;
use crate::utils::error::GenerationError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Text generation through a chat-completions style endpoint. Failures are
/// classified so the caller can tell a rate limit from a bad key from a
/// network drop.
pub struct ChatGenerator {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatGenerator {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder().timeout(timeout).build().unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
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
    content: Option<String>,
}

#[async_trait]
impl TextGenerator for ChatGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    GenerationError::Network(e.to_string())
                } else {
                    GenerationError::Unknown(e.to_string())
                }
            })?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => return Err(GenerationError::RateLimited),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(GenerationError::Auth)
            }
            status if !status.is_success() => {
                let detail = response.text().await.unwrap_or_default();
                return Err(GenerationError::Unknown(format!(
                    "HTTP {}: {}",
                    status, detail
                )));
            }
            _ => {}
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Unknown(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerationError::Unknown("empty completion".to_string()))
    }
}
