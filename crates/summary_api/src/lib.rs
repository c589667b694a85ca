//! HTTP surface for the summarization pipeline.
//!
//! Routes are divided into:
//! - Public: `/`, `/health`, `/signup`, `/login`
//! - Protected (bearer session token): `/summarize`, `/users/me`,
//!   `/users/me/keys/*`, `/history`

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::time::Duration;

use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use axum::Router;
use summary_datastore::DataStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use config::ApiConfig;
pub use state::AppState;

/// Build the router with all routes and middleware.
pub fn build_router<S>(state: AppState<S>) -> Router
where
    S: DataStore + Clone + Send + Sync + 'static,
{
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let public_routes = Router::new()
        .route("/", get(routes::api_info))
        .route("/health", get(routes::health::health_check))
        .route("/signup", post(routes::users::signup::<S>))
        .route("/login", post(routes::users::login::<S>));

    let protected_routes = Router::new()
        .route("/summarize", post(routes::summarize::summarize::<S>))
        .route("/users/me", get(routes::users::me))
        .route("/users/me/keys", get(routes::keys::list_keys::<S>))
        .route(
            "/users/me/keys/{provider}",
            put(routes::keys::store_key::<S>),
        )
        .route(
            "/users/me/keys/{provider}",
            delete(routes::keys::delete_key::<S>),
        )
        .route("/history", get(routes::history::list_history::<S>))
        .layer(from_fn_with_state(state.clone(), auth::session_auth::<S>));

    let request_timeout = state.config.request_timeout;

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(routes::not_found)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API until ctrl-c or SIGTERM.
///
/// Also runs the rate-limiter idle-bucket sweep so a long-lived process
/// keeps memory flat.
pub async fn serve<S>(addr: SocketAddr, state: AppState<S>) -> anyhow::Result<()>
where
    S: DataStore + Clone + Send + Sync + 'static,
{
    let pipeline = state.pipeline.clone();
    let idle = state.config.bucket_idle_eviction;
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(sweep_period(idle));
        loop {
            tick.tick().await;
            pipeline.limiter().evict_idle(idle);
        }
    });

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Starting summary-api server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

fn sweep_period(idle: Duration) -> Duration {
    (idle / 4).max(Duration::from_secs(60))
}

/// Shutdown signal handler.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
