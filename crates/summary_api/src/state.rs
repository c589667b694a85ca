use std::sync::Arc;

use summary_datastore::{DataStore, NewQuery};
use summary_pipeline::{
    HistoryEntry, HistorySink, KeyResolver, ModelRouter, RateLimiter, SourceRouter, StaticKeys,
    SummarizePipeline, SummarizePipelineBuilder, YouTubeProvider,
};

use crate::config::ApiConfig;

pub type ApiPipeline<S> =
    SummarizePipeline<SourceRouter, ModelRouter, ChainKeyResolver<S>, QueryHistorySink<S>>;

/// Shared application state, cheap to clone per request.
pub struct AppState<S>
where
    S: DataStore + Clone + Send + Sync + 'static,
{
    pub store: S,
    pub pipeline: Arc<ApiPipeline<S>>,
    pub config: Arc<ApiConfig>,
}

impl<S> Clone for AppState<S>
where
    S: DataStore + Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        AppState {
            store: self.store.clone(),
            pipeline: self.pipeline.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S> AppState<S>
where
    S: DataStore + Clone + Send + Sync + 'static,
{
    pub fn new(store: S, config: ApiConfig) -> Self {
        let provider = SourceRouter::new(YouTubeProvider::new(
            config.transcript_language.clone(),
            config.transcript_timeout,
        ));

        let pipeline = SummarizePipelineBuilder::new()
            .provider(provider)
            .models(ModelRouter::new(config.model_timeout))
            .key_resolver(ChainKeyResolver {
                store: store.clone(),
                process_keys: config.process_keys.clone(),
            })
            .history(QueryHistorySink {
                store: store.clone(),
            })
            .limiter(RateLimiter::new(
                config.rate_capacity,
                config.rate_refill_rate,
            ))
            .build();

        AppState {
            store,
            pipeline: Arc::new(pipeline),
            config: Arc::new(config),
        }
    }
}

/// Key-resolution chain: the user's stored key wins, the process-wide
/// fallback covers everyone else. A storage failure degrades to the
/// fallback tier rather than failing the request.
#[derive(Debug, Clone)]
pub struct ChainKeyResolver<S> {
    store: S,
    process_keys: StaticKeys,
}

impl<S> KeyResolver for ChainKeyResolver<S>
where
    S: DataStore + Send + Sync,
{
    async fn resolve_key(&self, identity: &str, provider: &str) -> Option<String> {
        match self.store.get_api_key(identity, provider).await {
            Ok(Some(key)) => Some(key),
            Ok(None) => self.process_keys.get(provider),
            Err(e) => {
                tracing::warn!(
                    error = ?e,
                    identity,
                    provider,
                    "User key lookup failed, falling back to process key"
                );
                self.process_keys.get(provider)
            }
        }
    }
}

/// Persists each result record to the queries table.
#[derive(Debug, Clone)]
pub struct QueryHistorySink<S> {
    store: S,
}

impl<S> HistorySink for QueryHistorySink<S>
where
    S: DataStore + Send + Sync,
{
    async fn record(&self, entry: HistoryEntry<'_>) -> anyhow::Result<()> {
        let metadata = &entry.result.metadata;
        self.store
            .insert_query(&NewQuery {
                username: entry.identity.to_string(),
                url: entry.request.url.clone(),
                provider_type: metadata.source_type.as_str().to_string(),
                model_type: metadata.model_type.as_str().to_string(),
                model_name: Some(metadata.model_name.clone()),
                word_count: metadata.word_count as i32,
                valid: entry.result.valid,
                processing_time: metadata.processing_time_seconds,
            })
            .await
    }
}
