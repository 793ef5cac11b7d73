//! Post command - share text and an optional image to a site

use crate::cli::style::{Stylize, check, spinner_style};
use crate::cli::{CliHost, CliProgress};
use anstream::{eprintln, println};
use dialoguer::Select;
use indicatif::ProgressBar;
use press_share::auth::{CredentialStore, SharedCredentialStore, list_sites};
use press_share::config::Settings;
use press_share::content::compose_share_text;
use press_share::error::{Error, Result};
use press_share::publish::WpcomPublishClient;
use press_share::share::{
    EntryDecision, ExtensionLifecycleGate, HostContext, SubmissionCoordinator,
};
use press_share::transport::{SessionConfig, TransportSession};
use press_share::types::{Credential, Destination, PublicationStatus, ShareItem};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Options for the post command
#[derive(Debug, Clone, Default)]
pub struct PostOptions {
    /// Shared text
    pub text: Option<String>,
    /// Web page the text was shared from
    pub url: Option<Url>,
    /// Image to upload alongside the post
    pub image: Option<PathBuf>,
    /// Destination site id
    pub site: Option<u64>,
    /// Publication status; settings default when absent
    pub status: Option<PublicationStatus>,
    /// Queue uploads without sending them, leaving them to `resume`
    pub detach: bool,
}

/// Run the post command
pub async fn run_post(settings: &Settings, options: PostOptions) -> Result<()> {
    let host = Arc::new(CliHost::default());
    let store = SharedCredentialStore::from_settings(settings);

    let credential = store.credential().await;
    if ExtensionLifecycleGate::enforce(credential.as_ref(), host.as_ref())
        == EntryDecision::MustAbort
    {
        return Err(Error::MissingCredential);
    }
    let Some(credential) = credential else {
        return Err(Error::MissingCredential);
    };

    let item = ShareItem::new(
        compose_share_text(options.text.as_deref(), options.url.as_ref()),
        options.image.as_deref().map(image_location).transpose()?,
    );

    let primary = store.primary_destination().await;
    let mut destination = match options.site {
        Some(id) => Some(
            primary
                .filter(|p| p.id == id)
                .unwrap_or_else(|| Destination::new(id, format!("Site {id}"))),
        ),
        None => primary,
    };
    if destination.is_none() && std::io::stdin().is_terminal() {
        destination = pick_site(settings, &credential).await?;
    }

    if !ExtensionLifecycleGate::can_proceed(Some(&credential), destination.as_ref()) {
        eprintln!("{}", "Select a site to post to (use --site <ID>)".muted());
        host.cancel_request();
        return Err(Error::MissingDestination);
    }

    // Only a share that will be posted gets a session
    let mut config = SessionConfig::background_with_randomized_identifier(settings)
        .with_bearer_token(credential.access_token.clone());
    if options.detach {
        config = config.deferred();
    }
    let session = TransportSession::create(config)?;
    let client = WpcomPublishClient::new(session.clone());
    let progress = Arc::new(CliProgress::verbose());

    let mut coordinator = SubmissionCoordinator::new(
        Arc::new(client),
        host.clone(),
        progress.clone(),
        Some(credential),
        destination,
        item,
    );
    coordinator.set_status(options.status.unwrap_or(settings.default_status))?;

    let site = coordinator
        .destination()
        .map(|d| d.display_name.clone())
        .unwrap_or_default();
    let dispatch = coordinator.post()?;
    println!(
        "{} Shared to {} as {}",
        check(),
        site.accent(),
        coordinator.status().label().emphasis()
    );

    if options.detach {
        println!(
            "  {} {}",
            "Uploads queued; send them with".muted(),
            format!("press-share resume --session {}", dispatch.session_id).accent()
        );
        return Ok(());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!("Uploading {} asset(s)...", dispatch.assets.len()));
    spinner.enable_steady_tick(Duration::from_millis(80));
    session.wait_idle().await;
    spinner.finish_and_clear();
    session.discard_if_idle()?;

    if progress.failures() > 0 {
        return Err(Error::Api(format!(
            "{} upload(s) failed",
            progress.failures()
        )));
    }
    Ok(())
}

fn image_location(path: &std::path::Path) -> Result<Url> {
    let absolute = path
        .canonicalize()
        .map_err(|e| Error::InvalidArgument(format!("image {}: {e}", path.display())))?;
    Url::from_file_path(&absolute)
        .map_err(|()| Error::InvalidArgument(format!("image {} is not a file path", path.display())))
}

/// Site picker
async fn pick_site(settings: &Settings, credential: &Credential) -> Result<Option<Destination>> {
    let sites = list_sites(settings, credential).await?;
    if sites.is_empty() {
        return Ok(None);
    }

    let items: Vec<&str> = sites.iter().map(|s| s.display_name.as_str()).collect();
    let selection = Select::new()
        .with_prompt("Post to")
        .items(&items)
        .default(0)
        .interact_opt()
        .map_err(|e| Error::Internal(format!("Failed to read selection: {e}")))?;

    Ok(selection.map(|i| sites[i].clone()))
}
