//! Shared fixtures: credentials, destinations, recording host and listener

#![allow(dead_code)]

use press_share::share::{BlockingNotice, HostContext, OutcomeListener, SubmissionState};
use press_share::types::{Credential, Destination, ShareItem, UploadOutcome};
use std::sync::Mutex;
use url::Url;

pub fn credential() -> Credential {
    Credential::new("test-token", Some("alice".to_string()))
}

pub fn my_blog() -> Destination {
    Destination::new(42, "My Blog")
}

pub fn text_item(text: &str) -> ShareItem {
    ShareItem::new(Some(text.to_string()), None)
}

pub fn image_item(text: &str, image: &str) -> ShareItem {
    ShareItem::new(
        Some(text.to_string()),
        Some(Url::parse(image).expect("valid image url")),
    )
}

/// Host recording every call
#[derive(Default)]
pub struct RecordingHost {
    pub notices: Mutex<Vec<BlockingNotice>>,
    pub completed: Mutex<usize>,
    pub cancelled: Mutex<usize>,
}

impl RecordingHost {
    pub fn completed(&self) -> usize {
        *self.completed.lock().unwrap()
    }

    pub fn cancelled(&self) -> usize {
        *self.cancelled.lock().unwrap()
    }
}

impl HostContext for RecordingHost {
    fn present_notice(&self, notice: &BlockingNotice) {
        self.notices.lock().unwrap().push(notice.clone());
    }

    fn complete_request(&self) {
        *self.completed.lock().unwrap() += 1;
    }

    fn cancel_request(&self) {
        *self.cancelled.lock().unwrap() += 1;
    }
}

/// Listener recording states and outcomes
#[derive(Default)]
pub struct RecordingListener {
    pub states: Mutex<Vec<SubmissionState>>,
    pub outcomes: Mutex<Vec<UploadOutcome>>,
}

impl RecordingListener {
    pub fn states(&self) -> Vec<SubmissionState> {
        self.states.lock().unwrap().clone()
    }

    pub fn outcomes(&self) -> Vec<UploadOutcome> {
        self.outcomes.lock().unwrap().clone()
    }
}

impl OutcomeListener for RecordingListener {
    fn on_state(&self, state: SubmissionState) {
        self.states.lock().unwrap().push(state);
    }

    fn on_outcome(&self, outcome: &UploadOutcome) {
        self.outcomes.lock().unwrap().push(outcome.clone());
    }
}
