//! press-share - share to WordPress.com from the terminal
//!
//! CLI host for the share flow: compose, pick a site and status, post.

use anyhow::Result;
use clap::{Parser, Subcommand};
use press_share::config::Settings;
use press_share::types::PublicationStatus;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

mod cli;

#[derive(Parser)]
#[command(name = "press-share")]
#[command(about = "Share text and images to a WordPress.com site")]
#[command(version)]
struct Cli {
    /// Path to config.toml (defaults to the platform config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Share text and an optional image as a new post
    Post {
        /// Text to share; the first line becomes the title
        #[arg(short, long)]
        text: Option<String>,

        /// URL of the page being shared, appended to the text
        #[arg(short, long)]
        url: Option<Url>,

        /// Image to upload to the site's media library
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// Site id to post to (defaults to the app's primary site)
        #[arg(short, long)]
        site: Option<u64>,

        /// Post status: draft or publish
        #[arg(long)]
        status: Option<PublicationStatus>,

        /// Queue uploads and exit; send them later with `resume`
        #[arg(long)]
        detach: bool,
    },

    /// Finish uploads left behind by earlier share sessions
    Resume {
        /// Session identifier (all spooled sessions when omitted)
        #[arg(long)]
        session: Option<String>,
    },

    /// List sites the account can post to
    Sites,

    /// Authentication management
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Test authentication
    Test,
    /// Show authentication setup instructions
    Setup,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "press_share=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Post {
            text,
            url,
            image,
            site,
            status,
            detach,
        } => {
            cli::run_post(
                &settings,
                cli::PostOptions {
                    text,
                    url,
                    image,
                    site,
                    status,
                    detach,
                },
            )
            .await?;
        }
        Commands::Resume { session } => {
            cli::run_resume(&settings, session.as_deref()).await?;
        }
        Commands::Sites => {
            cli::run_sites(&settings).await?;
        }
        Commands::Auth { action } => {
            let action_str = match action {
                AuthAction::Test => "test",
                AuthAction::Setup => "setup",
            };
            cli::run_auth(&settings, action_str).await?;
        }
    }

    Ok(())
}
