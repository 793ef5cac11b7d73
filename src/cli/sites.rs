//! Sites command - list destinations for the signed-in account

use crate::cli::style::Stylize;
use anstream::println;
use press_share::auth::{CredentialStore, SharedCredentialStore, list_sites};
use press_share::config::Settings;
use press_share::error::{Error, Result};

/// Run the sites command
pub async fn run_sites(settings: &Settings) -> Result<()> {
    let store = SharedCredentialStore::from_settings(settings);
    let credential = store.credential().await.ok_or(Error::MissingCredential)?;
    let primary = store.primary_destination().await;

    let sites = list_sites(settings, &credential).await?;
    if sites.is_empty() {
        println!("No sites found for this account");
        return Ok(());
    }

    for site in &sites {
        let marker = if primary.as_ref().is_some_and(|p| p.id == site.id) {
            " (default)".muted()
        } else {
            String::new()
        };
        println!("{:>12}  {}{marker}", site.id.to_string().accent(), site.display_name);
    }
    Ok(())
}
