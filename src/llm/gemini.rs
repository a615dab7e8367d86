use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::json;

use crate::config::GeminiConfig;
use crate::llm::{ChannelError, ChannelProvider, ChatChannel};

pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");
        Self { client, config }
    }
}

impl ChannelProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn open_channel(&self) -> Box<dyn ChatChannel> {
        Box::new(GeminiChannel {
            client: self.client.clone(),
            config: self.config.clone(),
            contents: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

impl Content {
    fn new(role: &str, text: &str) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

/// One conversation against the `generateContent` API. The API itself is
/// stateless, so the channel replays its accumulated history on every call.
pub struct GeminiChannel {
    client: Client,
    config: GeminiConfig,
    contents: Vec<Content>,
}

#[async_trait]
impl ChatChannel for GeminiChannel {
    async fn send(&mut self, text: &str) -> Result<String, ChannelError> {
        self.contents.push(Content::new("user", text));

        match self.request().await {
            Ok(reply) => {
                self.contents.push(Content::new("model", &reply));
                Ok(reply)
            }
            Err(e) => {
                // A failed call is not part of the conversation.
                self.contents.pop();
                Err(e)
            }
        }
    }
}

impl GeminiChannel {
    async fn request(&self) -> Result<String, ChannelError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.api_base, self.config.model
        );
        let body = json!({ "contents": self.contents });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChannelError::Timeout
                } else {
                    ChannelError::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(ChannelError::RateLimited);
            }
            return Err(ChannelError::Api(format!("Gemini Error {}: {}", status, text)));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChannelError::Network(e.to_string()))?;

        let parts = json["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or(ChannelError::InvalidResponse)?;

        let reply = parts
            .iter()
            .filter_map(|p| p["text"].as_str())
            .collect::<Vec<_>>()
            .join("\n");

        if reply.is_empty() {
            return Err(ChannelError::InvalidResponse);
        }

        Ok(reply)
    }
}
