use serde::{Deserialize, Serialize};

/// Content source a transcript is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Youtube,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Youtube => "youtube",
        }
    }
}

/// Summarization backend family. `Huggingface` is the built-in offline
/// engine; the wire name is kept for existing clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Huggingface,
    Openai,
    Claude,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Huggingface => "huggingface",
            ModelType::Openai => "openai",
            ModelType::Claude => "claude",
        }
    }

    /// Name of the credential provider this backend draws on, if any.
    pub fn key_provider(&self) -> Option<&'static str> {
        match self {
            ModelType::Huggingface => None,
            ModelType::Openai => Some("openai"),
            ModelType::Claude => Some("anthropic"),
        }
    }
}

/// Plain-text derivation of a source's spoken content. Kept alongside the
/// joined text are the segment count and caption language so callers can
/// tell an empty caption track (representable, not an error) from a missing
/// one (an error at the provider).
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    pub text: String,
    pub segment_count: usize,
    pub language: Option<String>,
}

impl Transcript {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

pub const DEFAULT_MAX_LENGTH: usize = 1000;
pub const MAX_MAX_LENGTH: usize = 2000;

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_source_type() -> SourceType {
    SourceType::Youtube
}

fn default_model_type() -> ModelType {
    ModelType::Huggingface
}

/// A single summarize request as received at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub url: String,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default = "default_source_type")]
    pub provider_type: SourceType,
    #[serde(default = "default_model_type")]
    pub model_type: ModelType,
    #[serde(default)]
    pub model_name: Option<String>,
}

impl SummarizeRequest {
    /// Word budget for the summary. The requested length is taken as given
    /// (the word-count bound is a hard contract) and only clamped into the
    /// positive, serviceable range.
    pub fn word_budget(&self) -> usize {
        self.max_length.clamp(1, MAX_MAX_LENGTH)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryMetadata {
    pub word_count: usize,
    pub processing_time_seconds: f64,
    pub source_type: SourceType,
    pub model_type: ModelType,
    pub model_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_info: Option<String>,
}

/// The result record emitted once per successful request and handed to the
/// history sink. Never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResult {
    pub summary: String,
    pub valid: bool,
    pub metadata: SummaryMetadata,
}
