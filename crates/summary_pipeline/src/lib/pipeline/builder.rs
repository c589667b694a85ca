use crate::{
    history::HistorySink, keys::KeyResolver, limiter::RateLimiter, model::SummaryModel,
    provider::TranscriptProvider, validator::SummaryValidator, SummarizePipeline,
};

pub struct SummarizePipelineBuilder<P = (), M = (), K = (), H = ()> {
    provider: P,
    models: M,
    key_resolver: K,
    history: H,
    limiter: RateLimiter,
    validator: SummaryValidator,
}

impl SummarizePipelineBuilder {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            provider: (),
            models: (),
            key_resolver: (),
            history: (),
            limiter: RateLimiter::default(),
            validator: SummaryValidator::default(),
        }
    }
}

impl<P, M, K, H> SummarizePipelineBuilder<P, M, K, H> {
    pub fn provider<P2: TranscriptProvider + Send + Sync + 'static>(
        self,
        provider: P2,
    ) -> SummarizePipelineBuilder<P2, M, K, H> {
        SummarizePipelineBuilder {
            provider,
            models: self.models,
            key_resolver: self.key_resolver,
            history: self.history,
            limiter: self.limiter,
            validator: self.validator,
        }
    }

    pub fn models<M2: SummaryModel + Send + Sync + 'static>(
        self,
        models: M2,
    ) -> SummarizePipelineBuilder<P, M2, K, H> {
        SummarizePipelineBuilder {
            provider: self.provider,
            models,
            key_resolver: self.key_resolver,
            history: self.history,
            limiter: self.limiter,
            validator: self.validator,
        }
    }

    pub fn key_resolver<K2: KeyResolver + Send + Sync + 'static>(
        self,
        key_resolver: K2,
    ) -> SummarizePipelineBuilder<P, M, K2, H> {
        SummarizePipelineBuilder {
            provider: self.provider,
            models: self.models,
            key_resolver,
            history: self.history,
            limiter: self.limiter,
            validator: self.validator,
        }
    }

    pub fn history<H2: HistorySink + Send + Sync + 'static>(
        self,
        history: H2,
    ) -> SummarizePipelineBuilder<P, M, K, H2> {
        SummarizePipelineBuilder {
            provider: self.provider,
            models: self.models,
            key_resolver: self.key_resolver,
            history,
            limiter: self.limiter,
            validator: self.validator,
        }
    }

    pub fn limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn validator(mut self, validator: SummaryValidator) -> Self {
        self.validator = validator;
        self
    }
}

impl<P, M, K, H> SummarizePipelineBuilder<P, M, K, H>
where
    P: TranscriptProvider + Send + Sync + 'static,
    M: SummaryModel + Send + Sync + 'static,
    K: KeyResolver + Send + Sync + 'static,
    H: HistorySink + Send + Sync + 'static,
{
    pub fn build(self) -> SummarizePipeline<P, M, K, H> {
        SummarizePipeline {
            provider: self.provider,
            models: self.models,
            key_resolver: self.key_resolver,
            history: self.history,
            limiter: self.limiter,
            validator: self.validator,
        }
    }
}
