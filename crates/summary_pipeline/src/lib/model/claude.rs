use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::Error;
use crate::model::{prompt_word_target, truncate_chars};

// Claude's context window comfortably takes a longer transcript than the
// chat-completions backend.
const TRANSCRIPT_CHAR_BUDGET: usize = 100_000;
const MAX_COMPLETION_TOKENS: u32 = 1024;
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone)]
pub struct ClaudeClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ClaudeClient {
    pub fn new(timeout: Duration) -> Self {
        ClaudeClient {
            client: Client::new(),
            base_url: "https://api.anthropic.com/v1".into(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// One messages-API request; the caller decides about retries.
    pub async fn summarize(
        &self,
        api_key: &str,
        model_name: &str,
        transcript: &str,
        max_words: usize,
    ) -> Result<String, Error> {
        let target_words = prompt_word_target(max_words);
        let body = serde_json::json!({
            "model": model_name,
            "max_tokens": MAX_COMPLETION_TOKENS,
            "temperature": 0.3,
            "system": format!(
                "You are a summarization assistant. Create a concise summary of approximately {target_words} words."
            ),
            "messages": [
                {
                    "role": "user",
                    "content": format!(
                        "Summarize the following text concisely:\n\n{}",
                        truncate_chars(transcript, TRANSCRIPT_CHAR_BUDGET)
                    )
                }
            ]
        });

        let resp = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to reach anthropic"))
            .map_err(|e| Error::Upstream {
                provider: "anthropic".into(),
                status: None,
                message: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                provider: "anthropic".into(),
                status: Some(status),
                message,
            });
        }

        let response = resp
            .json::<MessageResponse>()
            .await
            .map_err(|e| Error::Upstream {
                provider: "anthropic".into(),
                status: None,
                message: format!("malformed messages response: {e}"),
            })?;

        response
            .content
            .iter()
            .find_map(|block| block.text.as_deref())
            .map(|text| text.trim().to_string())
            .ok_or_else(|| Error::Upstream {
                provider: "anthropic".into(),
                status: None,
                message: "no text content in messages response".into(),
            })
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    pub text: Option<String>,
}
