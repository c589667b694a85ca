use std::future::Future;

use chrono::Duration;

use crate::domain::{NewQuery, QueryRecord, User};

pub mod postgres;

/// Storage surface consumed by the HTTP layer.
///
/// `None` results are expected outcomes (unknown user, bad credentials,
/// expired session, no stored key); `Err` is reserved for storage
/// failures.
pub trait DataStore {
    /// Create an account. Returns `None` when the username is taken.
    fn create_user(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> impl Future<Output = anyhow::Result<Option<User>>> + Send;

    /// Verify credentials and touch `last_login`. Returns `None` on bad
    /// credentials or a disabled account.
    fn authenticate_user(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = anyhow::Result<Option<User>>> + Send;

    fn get_user(&self, username: &str) -> impl Future<Output = anyhow::Result<Option<User>>> + Send;

    /// Mint a bearer session token for an existing user.
    fn create_session(
        &self,
        username: &str,
        ttl: Duration,
    ) -> impl Future<Output = anyhow::Result<String>> + Send;

    /// Resolve a bearer token to its user, if the session is still live.
    fn resolve_session(
        &self,
        token: &str,
    ) -> impl Future<Output = anyhow::Result<Option<User>>> + Send;

    /// Store or replace a user's API key for a model provider.
    fn upsert_api_key(
        &self,
        username: &str,
        provider: &str,
        api_key: &str,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Fetch a user's decrypted API key for a provider.
    fn get_api_key(
        &self,
        username: &str,
        provider: &str,
    ) -> impl Future<Output = anyhow::Result<Option<String>>> + Send;

    /// Remove a stored key. Returns whether a key existed.
    fn delete_api_key(
        &self,
        username: &str,
        provider: &str,
    ) -> impl Future<Output = anyhow::Result<bool>> + Send;

    /// Providers the user has stored a key for, sorted by name.
    fn list_api_key_providers(
        &self,
        username: &str,
    ) -> impl Future<Output = anyhow::Result<Vec<String>>> + Send;

    fn insert_query(&self, query: &NewQuery) -> impl Future<Output = anyhow::Result<()>> + Send;

    fn list_queries(
        &self,
        username: &str,
        limit: i64,
    ) -> impl Future<Output = anyhow::Result<Vec<QueryRecord>>> + Send;
}
