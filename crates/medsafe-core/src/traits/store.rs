//! Credential store trait.

use std::fmt;

use async_trait::async_trait;

use crate::Result;

/// Keys held by a credential store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreKey {
    AccessToken,
    RefreshToken,
    /// Serialized profile JSON.
    User,
}

impl StoreKey {
    pub const ALL: [StoreKey; 3] = [StoreKey::AccessToken, StoreKey::RefreshToken, StoreKey::User];

    /// The persisted key name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::AccessToken => "accessToken",
            StoreKey::RefreshToken => "refreshToken",
            StoreKey::User => "user",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persistent key-value store owning the credential.
///
/// Only `get`, `set` and `delete` are exposed. Deleting a missing key succeeds.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self, key: StoreKey) -> Result<Option<String>>;

    async fn set(&self, key: StoreKey, value: &str) -> Result<()>;

    async fn delete(&self, key: StoreKey) -> Result<()>;

    /// Delete every key.
    async fn clear(&self) -> Result<()> {
        for key in StoreKey::ALL {
            self.delete(key).await?;
        }
        Ok(())
    }
}
