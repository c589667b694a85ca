use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use summary_pipeline::KeyResolver;

/// Two-tier resolver: per-user keys first, then a process-wide fallback.
#[derive(Clone, Default)]
pub struct MockKeyResolver {
    pub user_keys: HashMap<(String, String), String>,
    pub process_keys: HashMap<String, String>,
    pub lookups: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockKeyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_key(mut self, identity: &str, provider: &str, key: &str) -> Self {
        self.user_keys
            .insert((identity.to_string(), provider.to_string()), key.to_string());
        self
    }

    pub fn with_process_key(mut self, provider: &str, key: &str) -> Self {
        self.process_keys
            .insert(provider.to_string(), key.to_string());
        self
    }
}

impl KeyResolver for MockKeyResolver {
    async fn resolve_key(&self, identity: &str, provider: &str) -> Option<String> {
        self.lookups
            .lock()
            .unwrap()
            .push((identity.to_string(), provider.to_string()));
        self.user_keys
            .get(&(identity.to_string(), provider.to_string()))
            .or_else(|| self.process_keys.get(provider))
            .cloned()
    }
}
