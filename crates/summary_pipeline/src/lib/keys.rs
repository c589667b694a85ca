use std::collections::HashMap;
use std::future::Future;

/// Resolves the credential for a hosted model on behalf of a user.
///
/// Implementations run the whole priority chain (user-stored key, then a
/// process-wide fallback) and only ever read; `None` means the model is
/// unavailable to this user. The chain internals are deliberately behind
/// this seam so the pipeline can be tested against the contract alone.
pub trait KeyResolver {
    fn resolve_key(
        &self,
        identity: &str,
        provider: &str,
    ) -> impl Future<Output = Option<String>> + Send;
}

/// Fixed key set, used as the process-wide tier of a resolution chain and
/// as a standalone resolver in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticKeys {
    keys: HashMap<String, String>,
}

impl StaticKeys {
    pub fn new() -> Self {
        StaticKeys::default()
    }

    pub fn with_key(mut self, provider: impl Into<String>, key: impl Into<String>) -> Self {
        self.keys.insert(provider.into(), key.into());
        self
    }

    pub fn get(&self, provider: &str) -> Option<String> {
        self.keys.get(provider).cloned()
    }
}

impl KeyResolver for StaticKeys {
    async fn resolve_key(&self, _identity: &str, provider: &str) -> Option<String> {
        self.get(provider)
    }
}
