//! Anthropic Messages API client backing the assistant's chat fallback.

use super::http_client;
use crate::traits::{ChatBackend, ChatError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ANTHROPIC_BASE: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
const MAX_TOKENS: u32 = 1024;
const SYSTEM_PROMPT: &str = "You are a helpful AI assistant in a Star Trek LCARS interface. \
Be concise and helpful. Use a professional but friendly tone.";
const EMPTY_REPLY: &str = "No response generated";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    fn first_text(self) -> String {
        self.content
            .into_iter()
            .find(|b| b.kind == "text")
            .and_then(|b| b.text)
            .unwrap_or_else(|| EMPTY_REPLY.to_string())
    }
}

/// Chat client. Without an API key every call reports `NotConfigured`.
#[derive(Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    base: String,
    api_key: Option<String>,
    model: String,
}

impl ChatClient {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            base: ANTHROPIC_BASE.to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_base_url(mut self, base: &str) -> Self {
        self.base = base.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl ChatBackend for ChatClient {
    async fn send(&self, message: &str) -> Result<String, ChatError> {
        let key = self.api_key.as_deref().ok_or(ChatError::NotConfigured)?;
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: SYSTEM_PROMPT,
            messages: vec![Message {
                role: "user",
                content: message,
            }],
        };
        let res = self
            .client
            .post(format!("{}/v1/messages", self.base))
            .header("x-api-key", key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Failed(e.to_string()))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| ChatError::Failed(e.to_string()))?;
        if !status.is_success() {
            tracing::warn!(target: "lcars::chat", status = status.as_u16(), "Anthropic request failed");
            return Err(ChatError::Failed(format!("Anthropic {}", status.as_u16())));
        }
        let parsed: MessagesResponse =
            serde_json::from_str(&text).map_err(|e| ChatError::Failed(e.to_string()))?;
        Ok(parsed.first_text())
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_text_block_wins() {
        let json = r#"{"content":[{"type":"tool_use","id":"x"},{"type":"text","text":"Make it so."}]}"#;
        let parsed: MessagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.first_text(), "Make it so.");
    }

    #[test]
    fn no_text_block_uses_placeholder() {
        let parsed: MessagesResponse = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert_eq!(parsed.first_text(), EMPTY_REPLY);
    }

    #[tokio::test]
    async fn unkeyed_client_is_not_configured() {
        let client = ChatClient::new(None, Duration::from_secs(1));
        assert!(!client.is_configured());
        assert_eq!(client.send("hello").await, Err(ChatError::NotConfigured));
    }
}
