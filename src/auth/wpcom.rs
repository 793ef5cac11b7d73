//! WordPress.com account checks

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::types::{Credential, Destination};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Deserialize)]
struct MeResponse {
    display_name: Option<String>,
    username: Option<String>,
}

#[derive(Deserialize)]
struct SitesResponse {
    sites: Vec<SiteResponse>,
}

#[derive(Deserialize)]
struct SiteResponse {
    #[serde(rename = "ID")]
    id: u64,
    name: Option<String>,
    #[serde(rename = "URL")]
    url: Option<String>,
}

impl From<SiteResponse> for Destination {
    fn from(site: SiteResponse) -> Self {
        let display_name = site
            .name
            .filter(|n| !n.trim().is_empty())
            .or(site.url)
            .unwrap_or_else(|| format!("Site {}", site.id));
        Self::new(site.id, display_name)
    }
}

fn client(settings: &Settings) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .build()
        .map_err(|e| Error::Api(format!("failed to create HTTP client: {e}")))
}

async fn get_json<T: for<'de> Deserialize<'de>>(
    settings: &Settings,
    credential: &Credential,
    path: &str,
) -> Result<T> {
    let url = settings.api_base.join(path)?;
    debug!(%url, "requesting");

    let response = client(settings)?
        .get(url)
        .bearer_auth(&credential.access_token)
        .send()
        .await?;

    match response.status() {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Auth(format!(
            "Invalid token: HTTP {}",
            response.status().as_u16()
        ))),
        status if !status.is_success() => Err(Error::Api(format!(
            "{path} failed with HTTP {}",
            status.as_u16()
        ))),
        _ => Ok(response.json().await?),
    }
}

/// Check the credential against the service, returning the account name
pub async fn test_auth(settings: &Settings, credential: &Credential) -> Result<String> {
    let me: MeResponse = get_json(settings, credential, "me").await?;
    Ok(me
        .display_name
        .or(me.username)
        .unwrap_or_else(|| "Unknown User".to_string()))
}

/// Sites the account can publish to
pub async fn list_sites(settings: &Settings, credential: &Credential) -> Result<Vec<Destination>> {
    let response: SitesResponse = get_json(settings, credential, "me/sites").await?;
    let sites: Vec<Destination> = response.sites.into_iter().map(Destination::from).collect();
    debug!(count = sites.len(), "listed sites");
    Ok(sites)
}
