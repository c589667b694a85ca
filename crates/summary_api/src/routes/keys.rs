use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use summary_datastore::DataStore;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Credential providers a user may store a key for.
const KNOWN_PROVIDERS: &[&str] = &["openai", "anthropic"];

#[derive(Debug, Deserialize)]
pub struct StoreKeyRequest {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct KeyListResponse {
    pub providers: Vec<String>,
}

fn validate_provider(provider: &str) -> Result<(), ApiError> {
    if KNOWN_PROVIDERS.contains(&provider) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "unknown key provider: {provider}"
        )))
    }
}

/// Store or replace the caller's API key for a provider.
pub async fn store_key<S>(
    State(state): State<AppState<S>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(provider): Path<String>,
    Json(req): Json<StoreKeyRequest>,
) -> ApiResult<StatusCode>
where
    S: DataStore + Clone + Send + Sync + 'static,
{
    validate_provider(&provider)?;
    if req.api_key.trim().is_empty() {
        return Err(ApiError::BadRequest("api_key must not be empty".into()));
    }

    state
        .store
        .upsert_api_key(&user.username, &provider, req.api_key.trim())
        .await?;

    tracing::info!(username = %user.username, provider, "Stored user api key");
    Ok(StatusCode::NO_CONTENT)
}

/// Providers the caller has a key stored for. Key values are never
/// returned.
pub async fn list_keys<S>(
    State(state): State<AppState<S>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<KeyListResponse>>
where
    S: DataStore + Clone + Send + Sync + 'static,
{
    let providers = state.store.list_api_key_providers(&user.username).await?;
    Ok(Json(KeyListResponse { providers }))
}

/// Remove the caller's stored key for a provider.
pub async fn delete_key<S>(
    State(state): State<AppState<S>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(provider): Path<String>,
) -> ApiResult<StatusCode>
where
    S: DataStore + Clone + Send + Sync + 'static,
{
    validate_provider(&provider)?;

    if state.store.delete_api_key(&user.username, &provider).await? {
        tracing::info!(username = %user.username, provider, "Deleted user api key");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
