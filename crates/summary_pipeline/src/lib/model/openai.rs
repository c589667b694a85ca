use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::Error;
use crate::model::{prompt_word_target, truncate_chars};

/// Character budget that keeps a transcript within a single
/// chat-completions request.
const TRANSCRIPT_CHAR_BUDGET: usize = 48_000;
const MAX_COMPLETION_TOKENS: u32 = 1024;

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl OpenAiClient {
    pub fn new(timeout: Duration) -> Self {
        OpenAiClient {
            client: Client::new(),
            base_url: "https://api.openai.com/v1".into(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// One chat-completions request; the caller decides about retries.
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
            "temperature": 0.3,
            "max_tokens": MAX_COMPLETION_TOKENS,
            "messages": [
                {
                    "role": "system",
                    "content": format!(
                        "You are a summarization assistant. Create a concise summary of approximately {target_words} words."
                    )
                },
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
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to reach openai"))
            .map_err(|e| Error::Upstream {
                provider: "openai".into(),
                status: None,
                message: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                provider: "openai".into(),
                status: Some(status),
                message,
            });
        }

        let response = resp
            .json::<CompletionResponse>()
            .await
            .map_err(|e| Error::Upstream {
                provider: "openai".into(),
                status: None,
                message: format!("malformed completion response: {e}"),
            })?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .map(|content| content.trim().to_string())
            .ok_or_else(|| Error::Upstream {
                provider: "openai".into(),
                status: None,
                message: "no content in completion response".into(),
            })
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub content: Option<String>,
}
