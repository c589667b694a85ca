pub mod builder;

use std::time::Instant;

use crate::{
    error::{Error, PipelineError, Stage},
    history::{HistoryEntry, HistorySink},
    keys::KeyResolver,
    limiter::RateLimiter,
    model::{ModelSelection, SummaryModel},
    provider::TranscriptProvider,
    types::{SummarizeRequest, SummaryMetadata, SummaryResult},
    validator::SummaryValidator,
};

// The core summarize orchestrator: admit -> select model -> fetch
// transcript -> summarize -> validate -> record.
#[derive(Debug)]
pub struct SummarizePipeline<P, M, K, H>
where
    P: TranscriptProvider + Send + Sync + 'static,
    M: SummaryModel + Send + Sync + 'static,
    K: KeyResolver + Send + Sync + 'static,
    H: HistorySink + Send + Sync + 'static,
{
    limiter: RateLimiter,
    provider: P,
    models: M,
    key_resolver: K,
    history: H,
    validator: SummaryValidator,
}

impl<P, M, K, H> SummarizePipeline<P, M, K, H>
where
    P: TranscriptProvider + Send + Sync + 'static,
    M: SummaryModel + Send + Sync + 'static,
    K: KeyResolver + Send + Sync + 'static,
    H: HistorySink + Send + Sync + 'static,
{
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Run one summarize request for an authenticated identity.
    ///
    /// Stages are strictly sequential. Admission comes first so no network
    /// or model work is wasted on a throttled request; model selection and
    /// key resolution follow for the same reason. Any failure is tagged
    /// with its stage and no partial result is emitted.
    #[tracing::instrument(skip(self, request), fields(url = %request.url))]
    pub async fn run(
        &self,
        identity: &str,
        request: &SummarizeRequest,
    ) -> Result<SummaryResult, PipelineError> {
        let started = Instant::now();

        self.limiter
            .admit(identity)
            .map_err(|e| PipelineError::new(Stage::Admission, e))?;

        let selection = ModelSelection::resolve(request.model_type, request.model_name.as_deref())
            .map_err(|e| PipelineError::new(Stage::ModelSelection, e))?;

        let api_key = match request.model_type.key_provider() {
            Some(provider) => {
                let key = self.key_resolver.resolve_key(identity, provider).await;
                if key.is_none() {
                    tracing::info!(provider, "No api key resolved for hosted model");
                    return Err(PipelineError::new(
                        Stage::ModelSelection,
                        Error::ModelUnavailable { provider },
                    ));
                }
                key
            }
            None => None,
        };

        let transcript = self
            .provider
            .fetch_transcript(request.provider_type, &request.url)
            .await
            .map_err(|e| PipelineError::new(Stage::Transcript, e))?;
        tracing::info!(
            segments = transcript.segment_count,
            words = transcript.word_count(),
            "Fetched transcript"
        );

        let summary = self
            .models
            .summarize(
                &selection,
                api_key.as_deref(),
                &transcript.text,
                request.word_budget(),
            )
            .await
            .map_err(|e| PipelineError::new(Stage::Summarize, e))?;

        let (valid, validation_info) = self.validator.check(&transcript, &summary);
        if !valid {
            tracing::warn!(info = ?validation_info, "Summary failed validation");
        }

        let result = SummaryResult {
            valid,
            metadata: SummaryMetadata {
                word_count: summary.split_whitespace().count(),
                processing_time_seconds: round_seconds(started.elapsed().as_secs_f64()),
                source_type: request.provider_type,
                model_type: selection.model_type,
                model_name: selection.model_name.clone(),
                validation_info,
            },
            summary,
        };

        if let Err(e) = self
            .history
            .record(HistoryEntry {
                identity,
                request,
                result: &result,
            })
            .await
        {
            tracing::warn!(error = ?e, "Failed to record query history");
        }

        Ok(result)
    }
}

fn round_seconds(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}
