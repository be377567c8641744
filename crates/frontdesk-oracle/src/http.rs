//! OpenAI-compatible chat completion client.

use crate::TextOracle;
use async_trait::async_trait;
use frontdesk_core::settings::OracleConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP adapter for an OpenAI-compatible `/chat/completions` endpoint.
///
/// The request timeout is set at client construction and applies to every
/// call; a timed-out call surfaces as an `Err` and the caller falls back.
pub struct HttpOracle {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl HttpOracle {
    /// Build a client from configuration. The API key is read from the
    /// environment variable named in the config; a missing key yields a
    /// client whose calls all fail (and therefore fall back) rather than a
    /// construction error.
    pub fn from_config(config: &OracleConfig) -> anyhow::Result<Self> {
        let api_key = std::env::var(&config.api_key_env).unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!(
                env = %config.api_key_env,
                "oracle API key not set; all oracle calls will fall back"
            );
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
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
impl TextOracle for HttpOracle {
    async fn complete(&self, system: &str, user: &str) -> anyhow::Result<String> {
        if self.api_key.is_empty() {
            anyhow::bail!("oracle API key is not configured");
        }

        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("oracle returned {}: {}", status, body);
        }

        let parsed: ChatResponse = response.json().await?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            anyhow::bail!("oracle returned no usable output");
        }

        Ok(text)
    }
}
