//! Platform secret-service credential store.

use async_trait::async_trait;
use tracing::{debug, warn};

use medsafe_core::error::{Error, StorageError};
use medsafe_core::{CredentialStore, Result, StoreKey};

const KEYRING_SERVICE: &str = "medsafe";

/// Stores each key as its own keyring entry under the `medsafe` service.
///
/// `account` namespaces the entries so several backends can keep separate
/// sessions on one machine.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    account: String,
}

impl KeyringStore {
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
        }
    }

    fn entry(&self, key: StoreKey) -> Result<keyring::Entry> {
        keyring::Entry::new(KEYRING_SERVICE, &format!("{}:{}", self.account, key))
            .map_err(map_keyring)
    }
}

fn map_keyring(err: keyring::Error) -> Error {
    match err {
        keyring::Error::NoStorageAccess(e) => Error::Storage(StorageError::Unavailable {
            message: e.to_string(),
        }),
        keyring::Error::PlatformFailure(e) => Error::Storage(StorageError::Unavailable {
            message: e.to_string(),
        }),
        other => Error::Storage(StorageError::Io {
            message: other.to_string(),
        }),
    }
}

#[async_trait]
impl CredentialStore for KeyringStore {
    async fn get(&self, key: StoreKey) -> Result<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) if value.trim().is_empty() => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(keyring::Error::BadEncoding(_)) => {
                warn!(%key, "Keyring entry is not valid UTF-8, ignoring");
                Ok(None)
            }
            Err(e) => Err(map_keyring(e)),
        }
    }

    async fn set(&self, key: StoreKey, value: &str) -> Result<()> {
        self.entry(key)?.set_password(value).map_err(map_keyring)?;
        debug!(%key, "Stored keyring entry");
        Ok(())
    }

    async fn delete(&self, key: StoreKey) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(map_keyring(e)),
        }
    }
}
