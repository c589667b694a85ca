use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use summary_datastore::{DataStore, NewQuery, QueryRecord, User};
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    // username -> (password, email, disabled, id)
    users: HashMap<String, (String, Option<String>, bool, i64)>,
    // token -> username
    sessions: HashMap<String, String>,
    // (username, provider) -> key
    api_keys: HashMap<(String, String), String>,
    // (username, record)
    queries: Vec<(String, QueryRecord)>,
    next_user_id: i64,
    next_query_id: i64,
}

/// In-memory [`DataStore`] for router tests.
#[derive(Clone, Default)]
pub struct MockDataStore {
    inner: Arc<Mutex<Inner>>,
}

impl MockDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn make_user(username: &str, email: Option<&str>, disabled: bool, id: i64) -> User {
        User {
            id,
            username: username.to_string(),
            email: email.map(str::to_string),
            disabled,
            created_at: Utc::now(),
            last_login: None,
        }
    }
}

impl DataStore for MockDataStore {
    async fn create_user(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> anyhow::Result<Option<User>> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.contains_key(username) {
            return Ok(None);
        }
        inner.next_user_id += 1;
        let id = inner.next_user_id;
        inner.users.insert(
            username.to_string(),
            (password.to_string(), email.map(str::to_string), false, id),
        );
        Ok(Some(Self::make_user(username, email, false, id)))
    }

    async fn authenticate_user(
        &self,
        username: &str,
        password: &str,
    ) -> anyhow::Result<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.get(username).and_then(
            |(stored_password, email, disabled, id)| {
                (stored_password == password && !disabled)
                    .then(|| Self::make_user(username, email.as_deref(), *disabled, *id))
            },
        ))
    }

    async fn get_user(&self, username: &str) -> anyhow::Result<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .get(username)
            .map(|(_, email, disabled, id)| {
                Self::make_user(username, email.as_deref(), *disabled, *id)
            }))
    }

    async fn create_session(&self, username: &str, _ttl: Duration) -> anyhow::Result<String> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.users.contains_key(username) {
            anyhow::bail!("No such user: {username}");
        }
        let token = Uuid::new_v4().to_string();
        inner.sessions.insert(token.clone(), username.to_string());
        Ok(token)
    }

    async fn resolve_session(&self, token: &str) -> anyhow::Result<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.sessions.get(token).and_then(|username| {
            inner
                .users
                .get(username)
                .map(|(_, email, disabled, id)| {
                    Self::make_user(username, email.as_deref(), *disabled, *id)
                })
        }))
    }

    async fn upsert_api_key(
        &self,
        username: &str,
        provider: &str,
        api_key: &str,
    ) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.users.contains_key(username) {
            anyhow::bail!("No such user: {username}");
        }
        inner.api_keys.insert(
            (username.to_string(), provider.to_string()),
            api_key.to_string(),
        );
        Ok(())
    }

    async fn get_api_key(&self, username: &str, provider: &str) -> anyhow::Result<Option<String>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .api_keys
            .get(&(username.to_string(), provider.to_string()))
            .cloned())
    }

    async fn delete_api_key(&self, username: &str, provider: &str) -> anyhow::Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner
            .api_keys
            .remove(&(username.to_string(), provider.to_string()))
            .is_some())
    }

    async fn list_api_key_providers(&self, username: &str) -> anyhow::Result<Vec<String>> {
        let inner = self.inner.lock().unwrap();
        let mut providers: Vec<String> = inner
            .api_keys
            .keys()
            .filter(|(user, _)| user == username)
            .map(|(_, provider)| provider.clone())
            .collect();
        providers.sort();
        Ok(providers)
    }

    async fn insert_query(&self, query: &NewQuery) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_query_id += 1;
        let record = QueryRecord {
            id: inner.next_query_id,
            url: query.url.clone(),
            provider_type: query.provider_type.clone(),
            model_type: query.model_type.clone(),
            model_name: query.model_name.clone(),
            word_count: query.word_count,
            valid: query.valid,
            processing_time: query.processing_time,
            created_at: Utc::now(),
        };
        inner.queries.push((query.username.clone(), record));
        Ok(())
    }

    async fn list_queries(&self, username: &str, limit: i64) -> anyhow::Result<Vec<QueryRecord>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .queries
            .iter()
            .filter(|(user, _)| user == username)
            .map(|(_, record)| record.clone())
            .rev()
            .take(limit as usize)
            .collect())
    }
}
