use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use summary_api::{ApiConfig, AppState};
use summary_datastore::PgDataStore;
use summary_pipeline::{tracing::init_tracing_subscriber, StaticKeys};

#[derive(Parser)]
#[command(name = "summary-api", about = "Authenticated YouTube summarization API")]
struct Cli {
    /// Address to bind the HTTP server on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    bind_addr: SocketAddr,

    /// Database connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Secret under which stored user API keys are encrypted at rest
    #[arg(long, env = "KEY_ENCRYPTION_SECRET")]
    key_encryption_secret: String,

    /// Process-wide OpenAI API key (fallback tier of key resolution)
    #[arg(long, env = "OPENAI_API_KEY")]
    openai_key: Option<String>,

    /// Process-wide Anthropic API key (fallback tier of key resolution)
    #[arg(long, env = "ANTHROPIC_API_KEY")]
    anthropic_key: Option<String>,

    /// Preferred caption language for transcripts
    #[arg(long, env = "TRANSCRIPT_LANGUAGE", default_value = "en")]
    transcript_language: String,

    /// Timeout for transcript fetches, in seconds
    #[arg(long, default_value = "30")]
    transcript_timeout: u64,

    /// Timeout for hosted-model calls, in seconds
    #[arg(long, default_value = "60")]
    model_timeout: u64,

    /// Rate-limit burst capacity per user
    #[arg(long, default_value = "5")]
    rate_capacity: f64,

    /// Rate-limit refill, tokens per second per user
    #[arg(long, default_value = "5")]
    rate_refill: f64,

    /// Session lifetime, in hours
    #[arg(long, default_value = "168")]
    session_ttl_hours: i64,

    /// Disable permissive CORS (for deployments behind a gateway)
    #[arg(long, default_value = "false")]
    disable_cors: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber("summary-api")?;

    let mut process_keys = StaticKeys::new();
    if let Some(key) = cli.openai_key {
        process_keys = process_keys.with_key("openai", key);
    }
    if let Some(key) = cli.anthropic_key {
        process_keys = process_keys.with_key("anthropic", key);
    }

    let config = ApiConfig {
        transcript_language: cli.transcript_language,
        transcript_timeout: Duration::from_secs(cli.transcript_timeout),
        model_timeout: Duration::from_secs(cli.model_timeout),
        rate_capacity: cli.rate_capacity,
        rate_refill_rate: cli.rate_refill,
        session_ttl: chrono::Duration::hours(cli.session_ttl_hours),
        enable_cors: !cli.disable_cors,
        process_keys,
        ..ApiConfig::default()
    };

    let store = PgDataStore::init(&cli.database_url, &cli.key_encryption_secret).await?;
    let state = AppState::new(store, config);

    summary_api::serve(cli.bind_addr, state).await
}
