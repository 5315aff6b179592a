//! Client wiring and session notices.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::debug;

use medsafe_client::{ApiClient, ClientConfig};
use medsafe_core::{ApiBaseUrl, CredentialStore, SessionEvent};
use medsafe_store::FileStore;

use crate::cli::Cli;
use crate::output;

/// Everything a command needs.
pub struct AppContext {
    pub client: ApiClient,
    /// Print results as JSON instead of labelled fields.
    pub json: bool,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = ClientConfig::from_env().context("Invalid client configuration")?;
        if let Some(base) = &cli.api_base_url {
            config = config.with_base_url(ApiBaseUrl::new(base).context("Invalid API base URL")?);
        }
        if let Some(secs) = cli.timeout {
            config = config.with_timeout((secs > 0).then(|| Duration::from_secs(secs)));
        }

        let store = open_store(cli, &config)?;
        Ok(Self {
            client: ApiClient::from_config(&config, store),
            json: cli.json,
        })
    }
}

#[cfg(feature = "keyring")]
fn open_store(cli: &Cli, config: &ClientConfig) -> Result<Arc<dyn CredentialStore>> {
    if cli.keyring {
        // One keyring account per backend host.
        let account = config.base_url.host().unwrap_or("local").to_string();
        debug!(%account, base_url = %config.base_url, "Opening keyring session");
        return Ok(Arc::new(medsafe_store::KeyringStore::new(account)));
    }
    open_file_store(cli, config)
}

#[cfg(not(feature = "keyring"))]
fn open_store(cli: &Cli, config: &ClientConfig) -> Result<Arc<dyn CredentialStore>> {
    open_file_store(cli, config)
}

fn open_file_store(cli: &Cli, config: &ClientConfig) -> Result<Arc<dyn CredentialStore>> {
    let path = match &cli.credentials_file {
        Some(path) => path.clone(),
        None => default_credentials_path()?,
    };
    debug!(path = %path.display(), base_url = %config.base_url, "Opening session");
    Ok(Arc::new(FileStore::new(path)))
}

/// `<data dir>/medsafe/credentials.json`.
fn default_credentials_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "medsafe").context("Could not determine data directory")?;
    Ok(dirs.data_dir().join("credentials.json"))
}

/// Print a single notice if the session expired while the command ran.
pub fn announce(events: &mut broadcast::Receiver<SessionEvent>) {
    let mut expired = false;
    loop {
        match events.try_recv() {
            Ok(SessionEvent::Expired) => expired = true,
            Ok(event) => debug!(?event, "Session event"),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
    if expired {
        output::notice("Session expired. Log in again with 'medsafe auth login'.");
    }
}
