use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use summary_datastore::{DataStore, QueryRecord};

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// The caller's most recent summarize requests, newest first.
pub async fn list_history<S>(
    State(state): State<AppState<S>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(params): Query<HistoryParams>,
) -> ApiResult<Json<Vec<QueryRecord>>>
where
    S: DataStore + Clone + Send + Sync + 'static,
{
    let limit = params.limit.clamp(1, MAX_LIMIT);
    let records = state.store.list_queries(&user.username, limit).await?;
    Ok(Json(records))
}
