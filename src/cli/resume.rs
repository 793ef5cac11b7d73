//! Resume command - finish uploads left behind by earlier share sessions

use crate::cli::CliProgress;
use crate::cli::style::Stylize;
use anstream::println;
use press_share::auth::{CredentialStore, SharedCredentialStore};
use press_share::config::Settings;
use press_share::error::{Error, Result};
use press_share::publish::WpcomPublishClient;
use press_share::transport::{SessionConfig, TransportSession};
use std::sync::Arc;

/// Run the resume command
///
/// Resumes one session, or every session found in the spool when
/// `session_id` is `None`.
pub async fn run_resume(settings: &Settings, session_id: Option<&str>) -> Result<()> {
    let store = SharedCredentialStore::from_settings(settings);
    let credential = store.credential().await.ok_or(Error::MissingCredential)?;

    let session_ids = match session_id {
        Some(id) => vec![id.to_string()],
        None => spooled_sessions(settings)?,
    };

    let progress = Arc::new(CliProgress::compact());
    let mut resumed = 0;
    for id in &session_ids {
        let session = TransportSession::create(
            SessionConfig::background(id.as_str(), settings)
                .with_bearer_token(credential.access_token.clone()),
        )?;
        let client = WpcomPublishClient::new(session.clone());

        let count = client.resume(progress.clone())?;
        if count > 0 {
            println!("Resuming {count} upload(s) from {}", id.accent());
            session.wait_idle().await;
            resumed += count;
        }
        session.discard_if_idle()?;
    }

    if resumed == 0 {
        println!("{}", "Nothing to resume".muted());
    }
    if progress.failures() > 0 {
        return Err(Error::Api(format!("{} upload(s) failed", progress.failures())));
    }
    Ok(())
}

/// Session directories present under the spool root
fn spooled_sessions(settings: &Settings) -> Result<Vec<String>> {
    if !settings.spool_dir.exists() {
        return Ok(Vec::new());
    }
    let mut ids = Vec::new();
    for entry in std::fs::read_dir(&settings.spool_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            ids.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    ids.sort();
    Ok(ids)
}
