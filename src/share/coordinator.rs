//! Submission coordinator
//!
//! State machine for one share session:
//! `Idle -> Validating -> Submitting -> Done`.
//!
//! Validation is synchronous and happens before any network activity. Once
//! validated, the text post is always dispatched and the image only when one
//! was shared. The two uploads are independent: neither waits for, links to,
//! or is affected by the other. The coordinator is done as soon as both are
//! dispatched; outcomes reach the listener whenever the transport delivers
//! them.

use crate::content::format_content;
use crate::error::{Error, Result};
use crate::publish::{OutcomeHandler, PublishClient};
use crate::share::{ExtensionLifecycleGate, HostContext, OutcomeListener};
use crate::types::{
    AssetKind, Credential, Destination, PreconditionFailure, PublicationStatus, ShareItem,
    SubmissionRequest, UploadOutcome,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Coordinator state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    /// Composing; destination and status may still change
    Idle,
    /// Checking preconditions
    Validating,
    /// Dispatching uploads
    Submitting,
    /// Uploads dispatched (or the session was cancelled)
    Done,
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Validating => write!(f, "Validating"),
            Self::Submitting => write!(f, "Submitting"),
            Self::Done => write!(f, "Done"),
        }
    }
}

/// Result of precondition checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// Everything needed is present
    Ready(SubmissionRequest),
    /// Submission must not start
    Blocked(PreconditionFailure),
}

/// What a successful [`SubmissionCoordinator::post`] dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// Transport session carrying the uploads
    pub session_id: String,
    /// Assets handed to the transport, in dispatch order
    pub assets: Vec<AssetKind>,
}

/// Orchestrates one share session
///
/// Credential and shared item are snapshots taken at session start.
/// Destination and status can change only while `Idle`.
pub struct SubmissionCoordinator {
    client: Arc<dyn PublishClient>,
    host: Arc<dyn HostContext>,
    listener: Arc<dyn OutcomeListener>,
    credential: Option<Credential>,
    destination: Option<Destination>,
    status: PublicationStatus,
    item: ShareItem,
    state: SubmissionState,
}

impl SubmissionCoordinator {
    /// Start a share session
    pub fn new(
        client: Arc<dyn PublishClient>,
        host: Arc<dyn HostContext>,
        listener: Arc<dyn OutcomeListener>,
        credential: Option<Credential>,
        destination: Option<Destination>,
        item: ShareItem,
    ) -> Self {
        Self {
            client,
            host,
            listener,
            credential,
            destination,
            status: PublicationStatus::default(),
            item,
            state: SubmissionState::Idle,
        }
    }

    /// Current state
    pub const fn state(&self) -> SubmissionState {
        self.state
    }

    /// Chosen destination, if any
    pub const fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    /// Chosen publication status
    pub const fn status(&self) -> PublicationStatus {
        self.status
    }

    /// Whether the "post" action should be enabled
    pub const fn is_content_valid(&self) -> bool {
        ExtensionLifecycleGate::can_proceed(self.credential.as_ref(), self.destination.as_ref())
    }

    /// Destination picker callback
    pub fn select_destination(&mut self, destination: Destination) -> Result<()> {
        self.ensure_editable("change destination")?;
        debug!(site_id = destination.id, site = %destination.display_name, "destination selected");
        self.destination = Some(destination);
        Ok(())
    }

    /// Status picker callback
    pub fn set_status(&mut self, status: PublicationStatus) -> Result<()> {
        self.ensure_editable("change status")?;
        debug!(%status, "status selected");
        self.status = status;
        Ok(())
    }

    /// Check preconditions and build the request
    pub fn validate(&self) -> Validation {
        let Some(ref credential) = self.credential else {
            return Validation::Blocked(PreconditionFailure::MissingCredential);
        };
        let Some(ref destination) = self.destination else {
            return Validation::Blocked(PreconditionFailure::MissingDestination);
        };

        Validation::Ready(SubmissionRequest::new(
            credential,
            destination.clone(),
            self.status,
            format_content(self.item.raw_text.as_deref()),
            self.item.image_location.clone(),
        ))
    }

    /// Commit the share: validate, dispatch uploads, release the host
    ///
    /// Returns right after dispatch. With unmet preconditions nothing is
    /// sent, the coordinator goes back to `Idle`, and
    /// [`Error::ContractViolation`] is returned; hosts are expected to have
    /// kept the post action disabled via [`is_content_valid`](Self::is_content_valid).
    pub fn post(&mut self) -> Result<Dispatch> {
        if self.state != SubmissionState::Idle {
            return Err(Error::InvalidState(format!("cannot post while {}", self.state)));
        }

        self.transition(SubmissionState::Validating);
        let request = match self.validate() {
            Validation::Ready(request) => request,
            Validation::Blocked(reason) => {
                error!(%reason, "post attempted with unmet precondition");
                self.transition(SubmissionState::Idle);
                return Err(Error::ContractViolation(reason));
            }
        };

        self.transition(SubmissionState::Submitting);
        let destination_id = request.destination().id;
        info!(
            site_id = destination_id,
            status = %request.status(),
            has_image = request.image_location().is_some(),
            "dispatching share"
        );

        let content = request.content();
        self.client.create_post(
            destination_id,
            request.status(),
            &content.title,
            &content.body,
            self.outcome_handler(),
        );

        let mut assets = vec![AssetKind::Text];
        if let Some(image) = request.image_location() {
            self.client
                .create_media(destination_id, image, self.outcome_handler());
            assets.push(AssetKind::Image);
        }

        self.transition(SubmissionState::Done);
        self.host.complete_request();

        Ok(Dispatch {
            session_id: self.client.session_id().to_string(),
            assets,
        })
    }

    /// User cancelled the share
    ///
    /// Only effective before submission starts; returns whether the session
    /// was cancelled. Uploads already dispatched are never cancelled here.
    pub fn cancel(&mut self) -> bool {
        if self.state != SubmissionState::Idle {
            warn!(state = %self.state, "cancel ignored, submission already started");
            return false;
        }
        info!("share cancelled by user");
        self.transition(SubmissionState::Done);
        self.host.cancel_request();
        true
    }

    fn ensure_editable(&self, what: &str) -> Result<()> {
        if self.state == SubmissionState::Idle {
            Ok(())
        } else {
            Err(Error::InvalidState(format!("cannot {what} while {}", self.state)))
        }
    }

    fn outcome_handler(&self) -> OutcomeHandler {
        let listener = Arc::clone(&self.listener);
        Box::new(move |outcome: UploadOutcome| listener.on_outcome(&outcome))
    }

    fn transition(&mut self, state: SubmissionState) {
        debug!(from = %self.state, to = %state, "submission state");
        self.state = state;
        self.listener.on_state(state);
    }
}
