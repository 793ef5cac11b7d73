//! Listener trait for interface-agnostic updates
//!
//! Lets different hosts (CLI, GUI shell, tests) observe a share session:
//! state transitions as they happen, and upload outcomes whenever the
//! transport delivers them.

use crate::share::SubmissionState;
use crate::types::UploadOutcome;

/// Receiver of share session events
///
/// `on_outcome` may be called after the session that dispatched the upload
/// has finished, and from a runtime worker thread.
pub trait OutcomeListener: Send + Sync {
    /// Called when the coordinator changes state
    fn on_state(&self, state: SubmissionState);

    /// Called once per submitted asset when its upload has finished
    fn on_outcome(&self, outcome: &UploadOutcome);
}

/// Listener that ignores everything
pub struct NoopListener;

impl OutcomeListener for NoopListener {
    fn on_state(&self, _state: SubmissionState) {}
    fn on_outcome(&self, _outcome: &UploadOutcome) {}
}
