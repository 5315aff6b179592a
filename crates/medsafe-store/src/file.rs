//! File-backed credential store.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use medsafe_core::error::{Error, StorageError};
use medsafe_core::{CredentialStore, Result, StoreKey};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// On-disk layout of the credential file.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<String>,
}

impl StoredCredentials {
    fn slot(&mut self, key: StoreKey) -> &mut Option<String> {
        match key {
            StoreKey::AccessToken => &mut self.access_token,
            StoreKey::RefreshToken => &mut self.refresh_token,
            StoreKey::User => &mut self.user,
        }
    }

    fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.user.is_none()
    }
}

/// Credential store persisted as one JSON document.
///
/// Writes take an exclusive lock on a sibling `.lock` file and replace the
/// document atomically, so two processes sharing the file never interleave.
/// On Unix the file is created with mode `0600`. When the last key is deleted
/// the file is removed.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store backed by the file at `path`. Nothing is touched until
    /// the first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the credential file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }

    fn lock(&self) -> Result<File> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())?;

        lock_file.lock_exclusive()?;
        Ok(lock_file)
    }

    fn read(&self) -> Result<StoredCredentials> {
        if !self.path.exists() {
            return Ok(StoredCredentials::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(StoredCredentials::default());
        }

        serde_json::from_str(&content).map_err(|e| {
            Error::Storage(StorageError::Corrupt {
                message: format!("{}: {}", self.path.display(), e),
            })
        })
    }

    fn write(&self, stored: &StoredCredentials) -> Result<()> {
        if stored.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
                debug!(path = %self.path.display(), "Removed empty credential file");
            }
            return Ok(());
        }

        let json = serde_json::to_string_pretty(stored).map_err(|e| {
            Error::Storage(StorageError::Corrupt {
                message: e.to_string(),
            })
        })?;

        let temp_path = self.temp_path();
        {
            let mut file = File::create(&temp_path)?;

            #[cfg(unix)]
            {
                let mut perms = file.metadata()?.permissions();
                perms.set_mode(0o600);
                fs::set_permissions(&temp_path, perms)?;
            }

            file.write_all(json.as_bytes())?;
            file.sync_data()?;
        }
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut StoredCredentials)) -> Result<()> {
        let lock_file = self.lock()?;

        let mut stored = self.read()?;
        apply(&mut stored);
        stored.updated_at = Some(Utc::now().to_rfc3339());
        let result = self.write(&stored);

        FileExt::unlock(&lock_file)?;
        result
    }
}

#[async_trait]
impl CredentialStore for FileStore {
    async fn get(&self, key: StoreKey) -> Result<Option<String>> {
        let mut stored = self.read()?;
        Ok(stored.slot(key).take())
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    async fn set(&self, key: StoreKey, value: &str) -> Result<()> {
        self.update(|stored| *stored.slot(key) = Some(value.to_string()))?;
        debug!(%key, "Stored credential entry");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn delete(&self, key: StoreKey) -> Result<()> {
        self.update(|stored| *stored.slot(key) = None)
    }

    async fn clear(&self) -> Result<()> {
        self.update(|stored| *stored = StoredCredentials::default())
    }
}
