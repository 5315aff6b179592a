//! In-memory credential store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use medsafe_core::{CredentialStore, Result, StoreKey};

/// Process-local store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<StoreKey, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with a credential.
    pub fn with_tokens(access_token: &str, refresh_token: Option<&str>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(StoreKey::AccessToken, access_token.to_string());
        if let Some(refresh_token) = refresh_token {
            entries.insert(StoreKey::RefreshToken, refresh_token.to_string());
        }
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// True if no key is set.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn get(&self, key: StoreKey) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(&key).cloned())
    }

    async fn set(&self, key: StoreKey, value: &str) -> Result<()> {
        self.entries.write().await.insert(key, value.to_string());
        Ok(())
    }

    async fn delete(&self, key: StoreKey) -> Result<()> {
        self.entries.write().await.remove(&key);
        Ok(())
    }
}
