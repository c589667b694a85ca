use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use summary_datastore::{DataStore, User};

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated principal, injected into request extensions by
/// [`session_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Bearer session-token authentication middleware for protected routes.
pub async fn session_auth<S>(
    State(state): State<AppState<S>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    S: DataStore + Clone + Send + Sync + 'static,
{
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.strip_prefix("Bearer ").unwrap_or(s).to_string());

    let Some(token) = token else {
        return Err(ApiError::Authentication(
            "Session token required. Provide it as 'Authorization: Bearer <token>'".to_string(),
        ));
    };

    match state
        .store
        .resolve_session(&token)
        .await
        .map_err(ApiError::internal)?
    {
        Some(user) => {
            request.extensions_mut().insert(CurrentUser(user));
            Ok(next.run(request).await)
        }
        None => Err(ApiError::Authentication(
            "Invalid or expired session token".to_string(),
        )),
    }
}
