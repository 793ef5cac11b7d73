//! Shared CLI outcome listener

use crate::cli::style::{Stylize, check, cross, hyperlink};
use anstream::{eprintln, println};
use press_share::share::{OutcomeListener, SubmissionState};
use press_share::types::UploadOutcome;
use std::sync::Mutex;

/// CLI listener that prints upload outcomes as they arrive
///
/// Two modes:
/// - verbose (post): shows state transitions too
/// - compact (resume): outcomes only, indented
pub struct CliProgress {
    /// Verbose mode shows state transitions
    pub verbose: bool,
    failures: Mutex<usize>,
}

impl CliProgress {
    /// Create verbose progress (for the post command)
    pub const fn verbose() -> Self {
        Self {
            verbose: true,
            failures: Mutex::new(0),
        }
    }

    /// Create compact progress (for the resume command)
    pub const fn compact() -> Self {
        Self {
            verbose: false,
            failures: Mutex::new(0),
        }
    }

    /// Number of failed uploads reported so far
    pub fn failures(&self) -> usize {
        *self.failures.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl OutcomeListener for CliProgress {
    fn on_state(&self, state: SubmissionState) {
        if self.verbose {
            match state {
                SubmissionState::Submitting => println!("{}", "Submitting...".muted()),
                SubmissionState::Idle | SubmissionState::Validating | SubmissionState::Done => {}
            }
        }
    }

    fn on_outcome(&self, outcome: &UploadOutcome) {
        let indent = if self.verbose { "" } else { "  " };
        if outcome.success {
            let id = outcome.remote_id.as_deref().unwrap_or("?");
            println!("{indent}{} Uploaded {} #{}", check(), outcome.asset, id.accent());
            if let Some(ref url) = outcome.remote_url {
                println!("{indent}    {}", hyperlink(url, url));
            }
        } else {
            *self
                .failures
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner) += 1;
            let reason = outcome
                .error
                .as_ref()
                .map_or_else(|| "unknown error".to_string(), ToString::to_string);
            eprintln!("{indent}{} Failed to upload {}: {reason}", cross(), outcome.asset);
        }
    }
}
