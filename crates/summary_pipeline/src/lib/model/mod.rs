pub mod claude;
pub mod local;
pub mod openai;

use std::future::Future;
use std::time::Duration;

use crate::error::Error;
use crate::types::ModelType;

use claude::ClaudeClient;
use local::ExtractiveEngine;
use openai::OpenAiClient;

/// Maps a transcript to a bounded-length summary.
///
/// The production implementation is [`ModelRouter`]; tests substitute
/// call-recording mocks.
pub trait SummaryModel {
    fn summarize(
        &self,
        selection: &ModelSelection,
        api_key: Option<&str>,
        transcript: &str,
        max_words: usize,
    ) -> impl Future<Output = Result<String, Error>> + Send;
}

/// A validated (model_type, model_name) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub model_type: ModelType,
    pub model_name: String,
}

const HUGGINGFACE_MODELS: &[&str] = &["facebook/bart-large-cnn", "sshleifer/distilbart-cnn-12-6"];
const OPENAI_MODELS: &[&str] = &["gpt-3.5-turbo", "gpt-4", "gpt-4o", "gpt-4o-mini"];
const CLAUDE_MODELS: &[&str] = &[
    "claude-3-haiku-20240307",
    "claude-3-sonnet-20240229",
    "claude-3-5-sonnet-20240620",
];

fn allowed_models(model_type: ModelType) -> &'static [&'static str] {
    match model_type {
        ModelType::Huggingface => HUGGINGFACE_MODELS,
        ModelType::Openai => OPENAI_MODELS,
        ModelType::Claude => CLAUDE_MODELS,
    }
}

impl ModelSelection {
    /// Resolve a request's model fields against each type's enumerated
    /// allowed set. A missing name picks the type's default (the first
    /// allowed entry); a name outside the set is rejected.
    pub fn resolve(model_type: ModelType, model_name: Option<&str>) -> Result<Self, Error> {
        let allowed = allowed_models(model_type);
        let model_name = match model_name {
            None => allowed[0],
            Some(name) => allowed
                .iter()
                .copied()
                .find(|allowed_name| *allowed_name == name)
                .ok_or_else(|| {
                    Error::UnsupportedModel(format!("{}/{}", model_type.as_str(), name))
                })?,
        };
        Ok(ModelSelection {
            model_type,
            model_name: model_name.to_string(),
        })
    }
}

/// Closed dispatch from a [`ModelSelection`] to a concrete backend.
///
/// The local engine runs on a blocking thread; the hosted backends make
/// exactly one outbound request per call and never retry internally.
#[derive(Debug, Clone)]
pub struct ModelRouter {
    local: ExtractiveEngine,
    openai: OpenAiClient,
    claude: ClaudeClient,
}

impl ModelRouter {
    pub fn new(timeout: Duration) -> Self {
        ModelRouter {
            local: ExtractiveEngine,
            openai: OpenAiClient::new(timeout),
            claude: ClaudeClient::new(timeout),
        }
    }

    pub fn with_openai_base_url(mut self, url: impl Into<String>) -> Self {
        self.openai = self.openai.with_base_url(url);
        self
    }

    pub fn with_claude_base_url(mut self, url: impl Into<String>) -> Self {
        self.claude = self.claude.with_base_url(url);
        self
    }
}

impl SummaryModel for ModelRouter {
    async fn summarize(
        &self,
        selection: &ModelSelection,
        api_key: Option<&str>,
        transcript: &str,
        max_words: usize,
    ) -> Result<String, Error> {
        let summary = match selection.model_type {
            ModelType::Huggingface => {
                let engine = self.local.clone();
                let text = transcript.to_string();
                tokio::task::spawn_blocking(move || engine.summarize(&text, max_words))
                    .await
                    .map_err(|e| Error::Upstream {
                        provider: "local".into(),
                        status: None,
                        message: format!("summarization task failed: {e}"),
                    })?
            }
            ModelType::Openai => {
                let key = api_key.ok_or(Error::ModelUnavailable { provider: "openai" })?;
                self.openai
                    .summarize(key, &selection.model_name, transcript, max_words)
                    .await?
            }
            ModelType::Claude => {
                let key = api_key.ok_or(Error::ModelUnavailable {
                    provider: "anthropic",
                })?;
                self.claude
                    .summarize(key, &selection.model_name, transcript, max_words)
                    .await?
            }
        };

        // Hosted backends cannot guarantee the word bound natively.
        Ok(truncate_words(&summary, max_words))
    }
}

/// Truncate `text` at a word boundary so at most `max_words` remain.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    let mut words = text.split_whitespace();
    let taken: Vec<&str> = words.by_ref().take(max_words).collect();
    if words.next().is_some() {
        taken.join(" ")
    } else {
        text.trim().to_string()
    }
}

/// Truncate `text` to at most `max_chars` bytes of whole words, for fitting
/// a transcript into a hosted model's context budget in a single request.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    if text.len() <= max_chars {
        return text;
    }
    let mut end = 0;
    for (idx, _) in text.match_indices(char::is_whitespace) {
        if idx > max_chars {
            break;
        }
        end = idx;
    }
    &text[..end]
}

/// Prompt word target, mirroring the summary length the caller asked for
/// but kept in a range hosted models follow reliably.
pub(crate) fn prompt_word_target(max_words: usize) -> usize {
    max_words.clamp(100, 500)
}
