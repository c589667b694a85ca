mod error;
mod history;
mod keys;
mod limiter;
pub mod model;
mod pipeline;
pub mod provider;
pub mod tracing;
pub mod types;
mod validator;

pub use error::{Error, PipelineError, Stage};
pub use history::{HistoryEntry, HistorySink};
pub use keys::{KeyResolver, StaticKeys};
pub use limiter::RateLimiter;
pub use model::{ModelRouter, ModelSelection, SummaryModel};
pub use pipeline::{builder::SummarizePipelineBuilder, SummarizePipeline};
pub use provider::{youtube::YouTubeProvider, SourceRouter, TranscriptProvider};
pub use types::{
    ModelType, SourceType, SummarizeRequest, SummaryMetadata, SummaryResult, Transcript,
};
pub use validator::SummaryValidator;
