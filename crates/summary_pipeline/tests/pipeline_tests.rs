mod mocks;

use std::time::Duration;

use mocks::{
    history::MockHistory, keys::MockKeyResolver, model::MockModel, provider::MockProvider,
};
use summary_pipeline::{
    Error, HistorySink, KeyResolver, ModelRouter, ModelType, SourceType, Stage, SummarizePipeline,
    SummarizePipelineBuilder, SummarizeRequest, SummaryModel, TranscriptProvider,
};

fn request(model_type: ModelType) -> SummarizeRequest {
    SummarizeRequest {
        url: "https://www.youtube.com/watch?v=abc12345678".into(),
        max_length: 1000,
        provider_type: SourceType::Youtube,
        model_type,
        model_name: None,
    }
}

fn build_pipeline<P, M, K, H>(
    provider: P,
    models: M,
    keys: K,
    history: H,
) -> SummarizePipeline<P, M, K, H>
where
    P: TranscriptProvider + Send + Sync + 'static,
    M: SummaryModel + Send + Sync + 'static,
    K: KeyResolver + Send + Sync + 'static,
    H: HistorySink + Send + Sync + 'static,
{
    SummarizePipelineBuilder::new()
        .provider(provider)
        .models(models)
        .key_resolver(keys)
        .history(history)
        .build()
}

/// Roughly 550 words: topical sentences interleaved with one-off filler so
/// the extractive engine has something to select and something to drop.
fn long_transcript() -> String {
    let fillers = [
        "Visitors in the gallery shuffled their papers quietly",
        "A photographer adjusted a tripod near the entrance",
        "Someone whispered about the afternoon tea arrangements",
        "The microphone crackled briefly before settling down",
        "Rain tapped against the chamber windows all morning",
    ];
    let mut sentences = Vec::new();
    for i in 0..25 {
        sentences.push(format!(
            "The budget committee of parliament reviewed finance estimates and county allocations in session {i}."
        ));
        sentences.push(format!("{}.", fillers[i % fillers.len()]));
    }
    sentences.join(" ")
}

// ─── Happy path ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn local_model_summary_is_bounded_and_valid() {
    let provider = MockProvider::new(&long_transcript());
    let history = MockHistory::new();
    let recorded = history.recorded.clone();

    let pipeline = build_pipeline(
        provider,
        ModelRouter::new(Duration::from_secs(60)),
        MockKeyResolver::new(),
        history,
    );

    let mut req = request(ModelType::Huggingface);
    req.max_length = 50;

    let result = pipeline.run("alice", &req).await.expect("pipeline should succeed");

    assert!(
        result.metadata.word_count <= 50,
        "word count {} should respect max_length 50",
        result.metadata.word_count
    );
    assert_eq!(
        result.metadata.word_count,
        result.summary.split_whitespace().count()
    );
    assert!(
        result.valid,
        "extractive summary of a topical transcript should validate, info: {:?}",
        result.metadata.validation_info
    );
    assert_eq!(result.metadata.source_type, SourceType::Youtube);
    assert_eq!(result.metadata.model_type, ModelType::Huggingface);
    assert_eq!(result.metadata.model_name, "facebook/bart-large-cnn");
    assert!(result.metadata.processing_time_seconds >= 0.0);

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.len(), 1, "history should receive exactly one record");
    assert_eq!(recorded[0].identity, "alice");
    assert_eq!(recorded[0].url, req.url);
    assert!(recorded[0].result.valid);
}

#[tokio::test]
async fn hosted_model_receives_resolved_key_and_clamped_budget() {
    let model = MockModel::new("A concise mock summary of the proceedings.");
    let model_calls = model.calls.clone();

    let pipeline = build_pipeline(
        MockProvider::new("some transcript text"),
        model,
        MockKeyResolver::new().with_process_key("openai", "sk-proc"),
        MockHistory::new(),
    );

    let mut req = request(ModelType::Openai);
    req.max_length = 50_000;

    pipeline.run("alice", &req).await.expect("pipeline should succeed");

    let calls = model_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].api_key.as_deref(), Some("sk-proc"));
    assert_eq!(calls[0].selection.model_name, "gpt-3.5-turbo");
    assert_eq!(calls[0].max_words, 2000, "oversized budgets clamp to the cap");
}

// ─── Key resolution ──────────────────────────────────────────────────────────

#[tokio::test]
async fn user_key_is_preferred_over_process_key_for_that_user_only() {
    let model = MockModel::new("summary");
    let model_calls = model.calls.clone();
    let resolver = MockKeyResolver::new()
        .with_user_key("alice", "openai", "sk-alice")
        .with_process_key("openai", "sk-proc");
    let lookups = resolver.lookups.clone();

    let pipeline = build_pipeline(
        MockProvider::new("transcript"),
        model,
        resolver,
        MockHistory::new(),
    );

    let req = request(ModelType::Openai);
    pipeline.run("alice", &req).await.expect("alice's call should succeed");
    pipeline.run("bob", &req).await.expect("bob's call should succeed");

    let calls = model_calls.lock().unwrap();
    assert_eq!(calls[0].api_key.as_deref(), Some("sk-alice"));
    assert_eq!(
        calls[1].api_key.as_deref(),
        Some("sk-proc"),
        "users without a stored key fall back to the process-wide key"
    );

    let lookups = lookups.lock().unwrap();
    assert_eq!(
        *lookups,
        vec![
            ("alice".to_string(), "openai".to_string()),
            ("bob".to_string(), "openai".to_string()),
        ],
        "one chain lookup per request, keyed by identity"
    );
}

#[tokio::test]
async fn hosted_model_without_any_key_fails_before_transcript_fetch() {
    let provider = MockProvider::new("transcript");
    let provider_calls = provider.calls.clone();
    let history = MockHistory::new();
    let recorded = history.recorded.clone();

    let pipeline = build_pipeline(
        provider,
        MockModel::new("summary"),
        MockKeyResolver::new(),
        history,
    );

    let err = pipeline
        .run("alice", &request(ModelType::Openai))
        .await
        .expect_err("no key anywhere should fail");

    assert_eq!(err.stage, Stage::ModelSelection);
    assert!(
        matches!(err.source, Error::ModelUnavailable { provider: "openai" }),
        "expected ModelUnavailable, got {:?}",
        err.source
    );
    assert!(
        provider_calls.lock().unwrap().is_empty(),
        "no transcript work should happen for an unavailable model"
    );
    assert!(recorded.lock().unwrap().is_empty());
}

// ─── Model selection ─────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_model_name_is_rejected_up_front() {
    let provider = MockProvider::new("transcript");
    let provider_calls = provider.calls.clone();

    let pipeline = build_pipeline(
        provider,
        MockModel::new("summary"),
        MockKeyResolver::new().with_process_key("openai", "sk-proc"),
        MockHistory::new(),
    );

    let mut req = request(ModelType::Openai);
    req.model_name = Some("gpt-99".into());

    let err = pipeline.run("alice", &req).await.expect_err("unknown name should fail");
    assert_eq!(err.stage, Stage::ModelSelection);
    assert!(matches!(err.source, Error::UnsupportedModel(_)));
    assert!(provider_calls.lock().unwrap().is_empty());
}

// ─── Rate limiting ───────────────────────────────────────────────────────────

#[tokio::test]
async fn sixth_rapid_call_is_rate_limited() {
    let pipeline = build_pipeline(
        MockProvider::new("transcript"),
        MockModel::new("summary"),
        MockKeyResolver::new(),
        MockHistory::new(),
    );

    let req = request(ModelType::Huggingface);
    let mut rejected = Vec::new();
    for _ in 0..6 {
        if let Err(e) = pipeline.run("alice", &req).await {
            rejected.push(e);
        }
    }

    assert_eq!(rejected.len(), 1, "exactly one of six rapid calls should be limited");
    let err = &rejected[0];
    assert_eq!(err.stage, Stage::Admission);
    match &err.source {
        Error::RateLimited {
            retry_after_seconds,
        } => assert!(*retry_after_seconds > 0.0),
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn rate_limit_is_per_identity() {
    let pipeline = build_pipeline(
        MockProvider::new("transcript"),
        MockModel::new("summary"),
        MockKeyResolver::new(),
        MockHistory::new(),
    );

    let req = request(ModelType::Huggingface);
    for _ in 0..5 {
        pipeline.run("alice", &req).await.expect("within alice's burst");
    }
    assert!(pipeline.run("alice", &req).await.is_err());
    assert!(
        pipeline.run("bob", &req).await.is_ok(),
        "bob's bucket is independent of alice's"
    );
}

// ─── Validation policy ───────────────────────────────────────────────────────

#[tokio::test]
async fn failed_validation_still_returns_the_summary() {
    let history = MockHistory::new();
    let recorded = history.recorded.clone();

    let pipeline = build_pipeline(
        MockProvider::new("a transcript with plenty of spoken words in it"),
        MockModel::new(""),
        MockKeyResolver::new(),
        history,
    );

    let result = pipeline
        .run("alice", &request(ModelType::Huggingface))
        .await
        .expect("validation failure is not an error");

    assert!(!result.valid);
    assert_eq!(
        result.metadata.validation_info.as_deref(),
        Some("summary is empty")
    );

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.len(), 1, "invalid results are still recorded");
    assert!(!recorded[0].result.valid);
}

// ─── Error propagation ───────────────────────────────────────────────────────

#[tokio::test]
async fn provider_failure_is_tagged_with_the_transcript_stage() {
    let model = MockModel::new("summary");
    let model_calls = model.calls.clone();
    let history = MockHistory::new();
    let recorded = history.recorded.clone();

    let pipeline = build_pipeline(
        MockProvider::failing("captions disabled"),
        model,
        MockKeyResolver::new(),
        history,
    );

    let err = pipeline
        .run("alice", &request(ModelType::Huggingface))
        .await
        .expect_err("provider failure should propagate");

    assert_eq!(err.stage, Stage::Transcript);
    assert!(matches!(err.source, Error::TranscriptUnavailable { .. }));
    assert!(err.to_string().contains("captions disabled"));
    assert!(model_calls.lock().unwrap().is_empty(), "no model work after a failed fetch");
    assert!(recorded.lock().unwrap().is_empty(), "no partial result is recorded");
}

#[tokio::test]
async fn model_failure_is_tagged_with_the_summarize_stage() {
    let history = MockHistory::new();
    let recorded = history.recorded.clone();

    let pipeline = build_pipeline(
        MockProvider::new("transcript"),
        MockModel::failing("upstream exploded"),
        MockKeyResolver::new().with_process_key("openai", "sk-proc"),
        history,
    );

    let err = pipeline
        .run("alice", &request(ModelType::Openai))
        .await
        .expect_err("model failure should propagate");

    assert_eq!(err.stage, Stage::Summarize);
    assert!(matches!(err.source, Error::Upstream { .. }));
    assert!(recorded.lock().unwrap().is_empty());
}

#[tokio::test]
async fn history_sink_failure_does_not_fail_the_call() {
    let pipeline = build_pipeline(
        MockProvider::new("a transcript with plenty of spoken words in it"),
        MockModel::new("plenty of spoken words, summarized"),
        MockKeyResolver::new(),
        MockHistory::failing("database connection refused"),
    );

    let result = pipeline.run("alice", &request(ModelType::Huggingface)).await;
    assert!(
        result.is_ok(),
        "a sink failure must not fail the summarize call: {:?}",
        result.err()
    );
}
