use chrono::{DateTime, Utc};
use serde::Serialize;

/// A registered account. The password hash never leaves the database; the
/// store only ever returns this credential-free view.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// One summarize request outcome, ready to be logged.
#[derive(Debug, Clone)]
pub struct NewQuery {
    pub username: String,
    pub url: String,
    pub provider_type: String,
    pub model_type: String,
    pub model_name: Option<String>,
    pub word_count: i32,
    pub valid: bool,
    pub processing_time: f64,
}

/// A logged summarize request as returned to the owning user.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct QueryRecord {
    pub id: i64,
    pub url: String,
    pub provider_type: String,
    pub model_type: String,
    pub model_name: Option<String>,
    pub word_count: i32,
    pub valid: bool,
    pub processing_time: f64,
    pub created_at: DateTime<Utc>,
}
