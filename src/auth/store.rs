//! Shared credential store

use crate::auth::AuthSource;
use crate::config::Settings;
use crate::types::{Credential, Destination};
use async_trait::async_trait;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable holding an access token
pub const TOKEN_ENV: &str = "PRESS_SHARE_TOKEN";

/// Environment variable holding the account name for [`TOKEN_ENV`]
pub const USERNAME_ENV: &str = "PRESS_SHARE_USERNAME";

/// Lookup of the stored credential and previously chosen site
///
/// Absence is a normal answer, not an error.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Access credential, if the user has signed in
    async fn credential(&self) -> Option<Credential>;

    /// Site selected as default in the main app, if any
    async fn primary_destination(&self) -> Option<Destination>;
}

#[derive(Debug, Default, Deserialize)]
struct SharedCredentialsFile {
    access_token: Option<String>,
    username: Option<String>,
    primary_site: Option<Destination>,
}

/// Credential store backed by the environment and a TOML file
///
/// ```toml
/// access_token = "..."
/// username = "alice"
///
/// [primary_site]
/// id = 42
/// name = "My Blog"
/// ```
///
/// Token priority:
/// 1. `PRESS_SHARE_TOKEN` environment variable
/// 2. `access_token` in the shared file
#[derive(Debug, Clone)]
pub struct SharedCredentialStore {
    path: PathBuf,
    use_env: bool,
}

impl SharedCredentialStore {
    /// Store reading the environment, then `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            use_env: true,
        }
    }

    /// Store reading only `path`
    pub fn file_only(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            use_env: false,
        }
    }

    /// Store at the configured credentials path
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.credentials_path.clone())
    }

    /// Path of the shared file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Credential together with where it came from
    pub async fn lookup(&self) -> Option<(Credential, AuthSource)> {
        if self.use_env {
            debug!("checking {TOKEN_ENV} env var");
            if let Some(token) = non_empty(env::var(TOKEN_ENV).ok()) {
                debug!("obtained token from {TOKEN_ENV} env var");
                let account = non_empty(env::var(USERNAME_ENV).ok());
                return Some((Credential::new(token, account), AuthSource::EnvVar));
            }
        }

        debug!(path = %self.path.display(), "checking shared credential file");
        let file = self.read_file().await?;
        let Some(token) = non_empty(file.access_token) else {
            debug!("shared credential file has no token");
            return None;
        };
        debug!("obtained token from shared credential file");
        Some((
            Credential::new(token, non_empty(file.username)),
            AuthSource::SharedStore,
        ))
    }

    async fn read_file(&self) -> Option<SharedCredentialsFile> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read shared credential file");
                return None;
            }
        };

        match toml::from_str(&text) {
            Ok(file) => Some(file),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "malformed shared credential file");
                None
            }
        }
    }
}

#[async_trait]
impl CredentialStore for SharedCredentialStore {
    async fn credential(&self) -> Option<Credential> {
        self.lookup().await.map(|(credential, _)| credential)
    }

    async fn primary_destination(&self) -> Option<Destination> {
        self.read_file().await?.primary_site
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
