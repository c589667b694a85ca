use axum::extract::State;
use axum::{Extension, Json};
use summary_datastore::DataStore;
use summary_pipeline::{SummarizeRequest, SummaryResult};

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::state::AppState;

/// Summarize content from the provided URL.
pub async fn summarize<S>(
    State(state): State<AppState<S>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<SummarizeRequest>,
) -> ApiResult<Json<SummaryResult>>
where
    S: DataStore + Clone + Send + Sync + 'static,
{
    tracing::info!(username = %user.username, url = %req.url, "Summarization requested");
    let result = state.pipeline.run(&user.username, &req).await?;
    Ok(Json(result))
}
