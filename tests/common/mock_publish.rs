//! Mock publish client for testing
//!
//! Records calls and answers each one immediately with a configurable
//! outcome.

#![allow(dead_code)]

use press_share::publish::{OutcomeHandler, PublishClient};
use press_share::types::{
    AssetKind, PublicationStatus, UploadError, UploadErrorKind, UploadOutcome,
};
use std::sync::Mutex;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishCall {
    Post {
        destination_id: u64,
        status: PublicationStatus,
        title: String,
        body: String,
    },
    Media {
        destination_id: u64,
        image_location: Url,
    },
}

#[derive(Default)]
pub struct MockPublishClient {
    calls: Mutex<Vec<PublishCall>>,
    post_failure: Mutex<Option<UploadErrorKind>>,
    media_failure: Mutex<Option<UploadErrorKind>>,
}

impl MockPublishClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_posts_with(&self, kind: UploadErrorKind) {
        *self.post_failure.lock().unwrap() = Some(kind);
    }

    pub fn fail_media_with(&self, kind: UploadErrorKind) {
        *self.media_failure.lock().unwrap() = Some(kind);
    }

    pub fn calls(&self) -> Vec<PublishCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn post_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, PublishCall::Post { .. }))
            .count()
    }

    pub fn media_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, PublishCall::Media { .. }))
            .count()
    }

    fn outcome(asset: AssetKind, failure: Option<UploadErrorKind>, id: &str) -> UploadOutcome {
        match failure {
            Some(kind) => UploadOutcome::failed(asset, UploadError::new(kind, "mock failure")),
            None => UploadOutcome::succeeded(asset, id.to_string(), None),
        }
    }
}

impl PublishClient for MockPublishClient {
    fn create_post(
        &self,
        destination_id: u64,
        status: PublicationStatus,
        title: &str,
        body: &str,
        on_complete: OutcomeHandler,
    ) {
        self.calls.lock().unwrap().push(PublishCall::Post {
            destination_id,
            status,
            title: title.to_string(),
            body: body.to_string(),
        });
        let failure = *self.post_failure.lock().unwrap();
        on_complete(Self::outcome(AssetKind::Text, failure, "100"));
    }

    fn create_media(&self, destination_id: u64, image_location: &Url, on_complete: OutcomeHandler) {
        self.calls.lock().unwrap().push(PublishCall::Media {
            destination_id,
            image_location: image_location.clone(),
        });
        let failure = *self.media_failure.lock().unwrap();
        on_complete(Self::outcome(AssetKind::Image, failure, "200"));
    }

    fn session_id(&self) -> &str {
        "mock-session"
    }
}
