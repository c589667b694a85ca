use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Form, Json};
use serde::{Deserialize, Serialize};
use summary_datastore::DataStore;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub email: Option<String>,
    pub disabled: bool,
}

fn validate_signup(req: &SignupRequest) -> Result<(), ApiError> {
    let len = req.username.chars().count();
    if !(3..=50).contains(&len) {
        return Err(ApiError::BadRequest(
            "username must be between 3 and 50 characters".into(),
        ));
    }
    if !req.username.chars().all(|c| c.is_alphanumeric()) {
        return Err(ApiError::BadRequest("username must be alphanumeric".into()));
    }
    if req.password.chars().count() < 6 {
        return Err(ApiError::BadRequest(
            "password must be at least 6 characters".into(),
        ));
    }
    Ok(())
}

/// Register a new user and return an access token.
pub async fn signup<S>(
    State(state): State<AppState<S>>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)>
where
    S: DataStore + Clone + Send + Sync + 'static,
{
    validate_signup(&req)?;

    let user = state
        .store
        .create_user(&req.username, &req.password, req.email.as_deref())
        .await?
        .ok_or_else(|| ApiError::BadRequest("username already registered".into()))?;

    tracing::info!(username = %user.username, "Registered new user");

    let access_token = state
        .store
        .create_session(&user.username, state.config.session_ttl)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            access_token,
            token_type: "bearer",
        }),
    ))
}

/// Authenticate a user and return an access token.
pub async fn login<S>(
    State(state): State<AppState<S>>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Json<TokenResponse>>
where
    S: DataStore + Clone + Send + Sync + 'static,
{
    let user = state
        .store
        .authenticate_user(&form.username, &form.password)
        .await?
        .ok_or_else(|| ApiError::Authentication("Incorrect username or password".into()))?;

    let access_token = state
        .store
        .create_session(&user.username, state.config.session_ttl)
        .await?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}

/// Current user information.
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        username: user.username,
        email: user.email,
        disabled: user.disabled,
    })
}
