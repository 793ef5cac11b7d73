//! Auth command - test and explain authentication

use crate::cli::style::{Stylize, check, spinner_style};
use anstream::println;
use indicatif::ProgressBar;
use press_share::auth::{SharedCredentialStore, TOKEN_ENV, USERNAME_ENV, test_auth};
use press_share::config::Settings;
use press_share::error::{Error, Result};
use std::time::Duration;

/// Run the auth test command
pub async fn run_auth_test(settings: &Settings) -> Result<()> {
    let store = SharedCredentialStore::from_settings(settings);
    let (credential, source) = store.lookup().await.ok_or(Error::MissingCredential)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message("Testing WordPress.com authentication...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = test_auth(settings, &credential).await;
    spinner.finish_and_clear();
    let username = result?;

    println!("{} Authenticated as: {}", check(), username.accent());
    println!("  {} {:?}", "Token source:".muted(), source);
    println!("  {} {}", "API:".muted(), settings.api_base);
    Ok(())
}

/// Run the auth setup command (show instructions)
pub fn run_auth_setup(settings: &Settings) {
    println!("{}", "WordPress.com Authentication Setup".emphasis());
    println!();
    println!("{}", "Option 1: Sign in from the WordPress app (recommended)".emphasis());
    println!("  The app shares its token through:");
    println!("  {}", settings.credentials_path.display().to_string().accent());
    println!();
    println!("{}", "Option 2: Environment variable".emphasis());
    println!("  Set {} (and optionally {})", TOKEN_ENV.accent(), USERNAME_ENV.accent());
    println!();
    println!("{}", "Credential file format:".muted());
    println!("  {}", "access_token = \"...\"".muted());
    println!("  {}", "username = \"alice\"".muted());
    println!("  {}", "[primary_site]".muted());
    println!("  {}", "id = 42".muted());
    println!("  {}", "name = \"My Blog\"".muted());
}

/// Wrapper for auth commands
pub async fn run_auth(settings: &Settings, action: &str) -> Result<()> {
    match action {
        "test" => run_auth_test(settings).await,
        "setup" => {
            run_auth_setup(settings);
            Ok(())
        }
        _ => Err(Error::InvalidArgument(format!(
            "Unknown action: {action}. Use 'test' or 'setup'."
        ))),
    }
}
