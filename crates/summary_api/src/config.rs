use std::time::Duration;

use summary_pipeline::StaticKeys;

/// Runtime configuration for the API, assembled from CLI flags and
/// environment variables by the binary.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Preferred caption language for transcript fetches.
    pub transcript_language: String,
    /// Budget for each transcript HTTP call.
    pub transcript_timeout: Duration,
    /// Budget for each hosted-model call.
    pub model_timeout: Duration,
    /// Whole-request timeout; must cover transcript plus model budgets.
    pub request_timeout: Duration,
    /// Token-bucket burst capacity per user.
    pub rate_capacity: f64,
    /// Token-bucket refill rate per user, tokens/second.
    pub rate_refill_rate: f64,
    /// Idle time after which a user's rate-limit bucket is evicted.
    pub bucket_idle_eviction: Duration,
    pub session_ttl: chrono::Duration,
    pub enable_cors: bool,
    /// Process-wide fallback keys for hosted models.
    pub process_keys: StaticKeys,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            transcript_language: "en".into(),
            transcript_timeout: Duration::from_secs(30),
            model_timeout: Duration::from_secs(60),
            request_timeout: Duration::from_secs(120),
            rate_capacity: 5.0,
            rate_refill_rate: 5.0,
            bucket_idle_eviction: Duration::from_secs(3600),
            session_ttl: chrono::Duration::hours(24 * 7),
            enable_cors: true,
            process_keys: StaticKeys::new(),
        }
    }
}
