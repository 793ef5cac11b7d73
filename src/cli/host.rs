//! Terminal stand-in for the host application

use crate::cli::style::Stylize;
use anstream::eprintln;
use press_share::share::{BlockingNotice, HostContext};
use tracing::debug;

/// Host that reports to the terminal
#[derive(Default)]
pub struct CliHost;

impl HostContext for CliHost {
    fn present_notice(&self, notice: &BlockingNotice) {
        eprintln!("{}", notice.title.emphasis());
        eprintln!("{}", notice.message);
        eprintln!("{}", format!("[{}]", notice.action).muted());
    }

    fn complete_request(&self) {
        debug!("share request complete");
    }

    fn cancel_request(&self) {
        eprintln!("{}", "Share cancelled".muted());
    }
}
