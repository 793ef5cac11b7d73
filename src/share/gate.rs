//! Entry gate for share sessions

use crate::share::{BlockingNotice, HostContext};
use crate::types::{Credential, Destination};
use tracing::{debug, info};

/// Whether a share session may continue past launch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryDecision {
    /// A credential exists; let the user compose
    Proceed,
    /// No credential; the session must be cancelled
    MustAbort,
}

/// Guards the share flow on credential and destination
pub struct ExtensionLifecycleGate;

impl ExtensionLifecycleGate {
    /// True only when both a credential and a destination are present
    ///
    /// Drives whether the "post" action is enabled.
    pub const fn can_proceed(
        credential: Option<&Credential>,
        destination: Option<&Destination>,
    ) -> bool {
        credential.is_some() && destination.is_some()
    }

    /// Decision at session start
    ///
    /// A missing destination does not abort: the user can still pick one.
    pub const fn on_entry(credential: Option<&Credential>) -> EntryDecision {
        if credential.is_some() {
            EntryDecision::Proceed
        } else {
            EntryDecision::MustAbort
        }
    }

    /// Apply [`on_entry`](Self::on_entry) against the host
    ///
    /// On `MustAbort` the missing-account notice is shown and, once
    /// acknowledged, the whole share request is cancelled.
    pub fn enforce(credential: Option<&Credential>, host: &dyn HostContext) -> EntryDecision {
        let decision = Self::on_entry(credential);
        match decision {
            EntryDecision::Proceed => debug!("credential present, share session may proceed"),
            EntryDecision::MustAbort => {
                info!("no credential available, aborting share session");
                host.present_notice(&BlockingNotice::MISSING_ACCOUNT);
                host.cancel_request();
            }
        }
        decision
    }
}
