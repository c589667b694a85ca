use axum::http::{header::RETRY_AFTER, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use summary_pipeline::{Error as PipelineStageError, PipelineError};

pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP-boundary error type. Pipeline errors keep their stable codes; the
/// rest map to the usual auth/validation/infrastructure statuses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("An unexpected error occurred")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Pipeline(e) => match e.source {
                PipelineStageError::InvalidUrl { .. }
                | PipelineStageError::UnsupportedModel(_) => StatusCode::BAD_REQUEST,
                PipelineStageError::TranscriptUnavailable { .. } => StatusCode::NOT_FOUND,
                PipelineStageError::Upstream { .. } => StatusCode::BAD_GATEWAY,
                PipelineStageError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
                PipelineStageError::ModelUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ApiError::Authentication(_) => "auth_failed",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::NotFound => "not_found",
            ApiError::Pipeline(e) => e.source.code(),
            ApiError::Internal(_) => "internal_error",
        }
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        ApiError::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref e) = self {
            tracing::error!(error = ?e, "Request failed unexpectedly");
        }

        let status = self.status_code();
        let mut error = json!({
            "code": self.error_code(),
            "message": self.to_string(),
        });

        let mut retry_after_header = None;
        if let ApiError::Pipeline(PipelineError {
            source:
                PipelineStageError::RateLimited {
                    retry_after_seconds,
                },
            ..
        }) = self
        {
            error["retry_after_seconds"] = json!(retry_after_seconds);
            retry_after_header = HeaderValue::from_str(&retry_after_seconds.ceil().to_string()).ok();
        }

        let mut response = (status, Json(json!({ "error": error }))).into_response();
        if let Some(value) = retry_after_header {
            response.headers_mut().insert(RETRY_AFTER, value);
        }
        response
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}
