//! Settings loaded from `config.toml`
//!
//! Every field is optional in the file; missing ones fall back to defaults.
//!
//! ```toml
//! api_base = "https://public-api.wordpress.com/rest/v1.1/"
//! spool_dir = "/var/tmp/press-share"
//! request_timeout_secs = 60
//! default_status = "draft"
//! credentials_path = "/Users/me/Library/Group Containers/share/credentials.toml"
//! ```

use crate::error::{Error, Result};
use crate::types::PublicationStatus;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Default REST API base
pub const DEFAULT_API_BASE: &str = "https://public-api.wordpress.com/rest/v1.1/";

/// Directory name used under the platform config/data dirs
pub const APP_DIR: &str = "press-share";

/// Environment variable overriding the API base
pub const API_BASE_ENV: &str = "PRESS_SHARE_API_BASE";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// REST API base, always ending in `/`
    pub api_base: Url,
    /// Root of the background transfer spool
    pub spool_dir: PathBuf,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Status used when the user does not pick one
    pub default_status: PublicationStatus,
    /// Shared credential file written by the main app
    pub credentials_path: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    api_base: Option<String>,
    spool_dir: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
    default_status: Option<PublicationStatus>,
    credentials_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: Url::parse(DEFAULT_API_BASE).expect("default API base is a valid URL"),
            spool_dir: default_spool_dir(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            default_status: PublicationStatus::default(),
            credentials_path: default_config_dir().join("credentials.toml"),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the default location
    ///
    /// A missing file is not an error. `PRESS_SHARE_API_BASE` overrides the
    /// API base from either source.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map_or_else(default_config_path, Path::to_path_buf);

        let mut settings = if path.exists() {
            debug!(path = %path.display(), "loading settings");
            Self::from_toml_str(&std::fs::read_to_string(&path)?)?
        } else {
            debug!(path = %path.display(), "no settings file, using defaults");
            Self::default()
        };

        if let Ok(base) = env::var(API_BASE_ENV) {
            debug!(api_base = %base, "API base overridden from environment");
            settings.api_base = parse_api_base(&base)?;
        }

        Ok(settings)
    }

    /// Parse settings from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: SettingsFile = toml::from_str(text)?;
        let defaults = Self::default();

        let api_base = match file.api_base {
            Some(ref base) => parse_api_base(base)?,
            None => defaults.api_base,
        };

        let request_timeout_secs = file
            .request_timeout_secs
            .unwrap_or(defaults.request_timeout_secs);
        if request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            api_base,
            spool_dir: file.spool_dir.unwrap_or(defaults.spool_dir),
            request_timeout_secs,
            default_status: file.default_status.unwrap_or(defaults.default_status),
            credentials_path: file.credentials_path.unwrap_or(defaults.credentials_path),
        })
    }
}

/// Parse an API base, adding the trailing slash relative joins need
pub fn parse_api_base(base: &str) -> Result<Url> {
    let mut url = Url::parse(base.trim())?;
    if url.cannot_be_a_base() {
        return Err(Error::Config(format!("API base cannot be a base URL: {base}")));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// `<config dir>/press-share`
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(env::temp_dir)
        .join(APP_DIR)
}

/// `<config dir>/press-share/config.toml`
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

fn default_spool_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(env::temp_dir)
        .join(APP_DIR)
        .join("transfers")
}
