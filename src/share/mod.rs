//! Share session flow
//!
//! [`ExtensionLifecycleGate`] decides whether a share session may start at
//! all; [`SubmissionCoordinator`] validates the user's choices and dispatches
//! the post and image uploads, then tells the host it is done.

mod coordinator;
mod gate;
mod host;
mod outcome;

pub use coordinator::{Dispatch, SubmissionCoordinator, SubmissionState, Validation};
pub use gate::{EntryDecision, ExtensionLifecycleGate};
pub use host::{BlockingNotice, HostContext};
pub use outcome::{NoopListener, OutcomeListener};
