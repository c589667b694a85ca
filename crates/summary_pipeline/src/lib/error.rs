use std::fmt;

/// Typed outcomes of a summarize request. Every variant is an expected
/// condition the caller can act on; anything unexpected from an upstream
/// service is wrapped as [`Error::Upstream`] rather than leaked raw.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not extract a video id from url: {url}")]
    InvalidUrl { url: String },

    #[error("transcript unavailable for {video_id}: {reason}")]
    TranscriptUnavailable { video_id: String, reason: String },

    #[error("unsupported model: {0}")]
    UnsupportedModel(String),

    #[error("no api key available for {provider}")]
    ModelUnavailable { provider: &'static str },

    #[error("upstream {provider} error: {message}")]
    Upstream {
        provider: String,
        status: Option<u16>,
        message: String,
    },

    #[error("rate limited, retry after {retry_after_seconds:.2}s")]
    RateLimited { retry_after_seconds: f64 },
}

impl Error {
    /// Stable machine-readable code surfaced to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidUrl { .. } => "invalid_url",
            Error::TranscriptUnavailable { .. } => "transcript_unavailable",
            Error::UnsupportedModel(_) => "unsupported_model",
            Error::ModelUnavailable { .. } => "model_unavailable",
            Error::Upstream { .. } => "upstream_error",
            Error::RateLimited { .. } => "rate_limited",
        }
    }
}

/// Pipeline stage names used to tag failures. Validation has no entry:
/// a failed quality check is a successful result with `valid = false`,
/// never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Admission,
    ModelSelection,
    Transcript,
    Summarize,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Admission => "admission",
            Stage::ModelSelection => "model_selection",
            Stage::Transcript => "transcript",
            Stage::Summarize => "summarize",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed error tagged with the pipeline stage it occurred in.
#[derive(Debug, thiserror::Error)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: Error,
}

impl PipelineError {
    pub fn new(stage: Stage, source: Error) -> Self {
        PipelineError { stage, source }
    }
}
