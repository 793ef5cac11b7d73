//! Share flow tests: gate and coordinator against a mock publish client

mod common;

use common::{
    MockPublishClient, PublishCall, RecordingHost, RecordingListener, credential, image_item,
    my_blog, text_item,
};
use press_share::error::Error;
use press_share::share::{
    BlockingNotice, EntryDecision, ExtensionLifecycleGate, SubmissionCoordinator, SubmissionState,
    Validation,
};
use press_share::types::{
    AssetKind, Credential, Destination, PreconditionFailure, PublicationStatus, ShareItem,
    UploadErrorKind,
};
use std::sync::Arc;

struct Harness {
    client: Arc<MockPublishClient>,
    host: Arc<RecordingHost>,
    listener: Arc<RecordingListener>,
}

impl Harness {
    fn new() -> Self {
        Self {
            client: Arc::new(MockPublishClient::new()),
            host: Arc::new(RecordingHost::default()),
            listener: Arc::new(RecordingListener::default()),
        }
    }

    fn coordinator(
        &self,
        credential: Option<Credential>,
        destination: Option<Destination>,
        item: ShareItem,
    ) -> SubmissionCoordinator {
        SubmissionCoordinator::new(
            self.client.clone(),
            self.host.clone(),
            self.listener.clone(),
            credential,
            destination,
            item,
        )
    }
}

#[test]
fn test_scenario_text_only_post() {
    let h = Harness::new();
    let mut coordinator = h.coordinator(
        Some(credential()),
        Some(my_blog()),
        text_item("Hello world\n\nhttps://example.com"),
    );
    coordinator.set_status(PublicationStatus::Publish).unwrap();

    let dispatch = coordinator.post().unwrap();

    assert_eq!(dispatch.assets, vec![AssetKind::Text]);
    assert_eq!(dispatch.session_id, "mock-session");
    assert_eq!(h.client.post_calls(), 1);
    assert_eq!(h.client.media_calls(), 0);

    let calls = h.client.calls();
    let PublishCall::Post {
        destination_id,
        status,
        title,
        body,
    } = &calls[0]
    else {
        panic!("expected a post call");
    };
    assert_eq!(*destination_id, 42);
    assert_eq!(status.as_str(), "publish");
    assert_eq!(title, "Hello world");
    assert!(body.contains("<a href=\"https://example.com\">https://example.com</a>"));
}

#[test]
fn test_text_and_image_dispatch_both() {
    let h = Harness::new();
    let mut coordinator = h.coordinator(
        Some(credential()),
        Some(my_blog()),
        image_item("Look at this", "file:///tmp/photo.jpg"),
    );

    let dispatch = coordinator.post().unwrap();

    assert_eq!(dispatch.assets, vec![AssetKind::Text, AssetKind::Image]);
    assert_eq!(h.client.post_calls(), 1);
    assert_eq!(h.client.media_calls(), 1);
    assert!(h.client.calls().contains(&PublishCall::Media {
        destination_id: 42,
        image_location: url::Url::parse("file:///tmp/photo.jpg").unwrap(),
    }));
}

#[test]
fn test_post_failure_does_not_affect_media() {
    let h = Harness::new();
    h.client.fail_posts_with(UploadErrorKind::Authorization);
    let mut coordinator = h.coordinator(
        Some(credential()),
        Some(my_blog()),
        image_item("Look", "file:///tmp/photo.jpg"),
    );

    coordinator.post().unwrap();

    let outcomes = h.listener.outcomes();
    assert_eq!(outcomes.len(), 2);
    let post = outcomes.iter().find(|o| o.asset == AssetKind::Text).unwrap();
    let media = outcomes.iter().find(|o| o.asset == AssetKind::Image).unwrap();
    assert_eq!(post.error_kind(), Some(UploadErrorKind::Authorization));
    assert!(media.success);
    assert_eq!(media.remote_id.as_deref(), Some("200"));
}

#[test]
fn test_media_failure_does_not_affect_post() {
    let h = Harness::new();
    h.client.fail_media_with(UploadErrorKind::Network);
    let mut coordinator = h.coordinator(
        Some(credential()),
        Some(my_blog()),
        image_item("Look", "file:///tmp/photo.jpg"),
    );

    coordinator.post().unwrap();

    let outcomes = h.listener.outcomes();
    let post = outcomes.iter().find(|o| o.asset == AssetKind::Text).unwrap();
    let media = outcomes.iter().find(|o| o.asset == AssetKind::Image).unwrap();
    assert!(post.success);
    assert_eq!(media.error_kind(), Some(UploadErrorKind::Network));
}

#[test]
fn test_missing_destination_blocks_and_stays_idle() {
    let h = Harness::new();
    let mut coordinator = h.coordinator(Some(credential()), None, text_item("Hello"));

    assert!(!coordinator.is_content_valid());
    assert_eq!(
        coordinator.validate(),
        Validation::Blocked(PreconditionFailure::MissingDestination)
    );

    let err = coordinator.post().unwrap_err();
    assert!(matches!(
        err,
        Error::ContractViolation(PreconditionFailure::MissingDestination)
    ));
    assert_eq!(coordinator.state(), SubmissionState::Idle);
    assert!(h.client.calls().is_empty());
    assert_eq!(h.host.completed(), 0);
}

#[test]
fn test_missing_credential_never_calls_client() {
    let h = Harness::new();
    let mut coordinator = h.coordinator(None, Some(my_blog()), text_item("Hello"));

    assert!(!coordinator.is_content_valid());
    let err = coordinator.post().unwrap_err();
    assert!(matches!(
        err,
        Error::ContractViolation(PreconditionFailure::MissingCredential)
    ));
    assert!(h.client.calls().is_empty());
}

#[test]
fn test_selecting_destination_enables_post() {
    let h = Harness::new();
    let mut coordinator = h.coordinator(Some(credential()), None, text_item("Hello"));
    assert!(!coordinator.is_content_valid());

    coordinator.select_destination(Destination::new(7, "Other")).unwrap();
    assert!(coordinator.is_content_valid());

    coordinator.post().unwrap();
    assert!(matches!(
        h.client.calls()[0],
        PublishCall::Post {
            destination_id: 7,
            ..
        }
    ));
}

#[test]
fn test_state_transitions_and_host_release() {
    let h = Harness::new();
    let mut coordinator = h.coordinator(Some(credential()), Some(my_blog()), text_item("Hi"));
    assert_eq!(coordinator.state(), SubmissionState::Idle);

    coordinator.post().unwrap();

    assert_eq!(coordinator.state(), SubmissionState::Done);
    assert_eq!(
        h.listener.states(),
        vec![
            SubmissionState::Validating,
            SubmissionState::Submitting,
            SubmissionState::Done
        ]
    );
    assert_eq!(h.host.completed(), 1);
    assert_eq!(h.host.cancelled(), 0);
}

#[test]
fn test_choices_locked_after_submission() {
    let h = Harness::new();
    let mut coordinator = h.coordinator(Some(credential()), Some(my_blog()), text_item("Hi"));
    coordinator.set_status(PublicationStatus::Draft).unwrap();
    coordinator.post().unwrap();

    assert!(matches!(
        coordinator.set_status(PublicationStatus::Publish),
        Err(Error::InvalidState(_))
    ));
    assert!(matches!(
        coordinator.select_destination(Destination::new(1, "x")),
        Err(Error::InvalidState(_))
    ));
    assert_eq!(coordinator.status(), PublicationStatus::Draft);

    // A second post is refused, nothing new is dispatched
    assert!(matches!(coordinator.post(), Err(Error::InvalidState(_))));
    assert_eq!(h.client.post_calls(), 1);
}

#[test]
fn test_draft_status_is_forwarded() {
    let h = Harness::new();
    let mut coordinator = h.coordinator(Some(credential()), Some(my_blog()), text_item("Hi"));
    coordinator.set_status(PublicationStatus::Draft).unwrap();
    coordinator.post().unwrap();

    assert!(matches!(
        h.client.calls()[0],
        PublishCall::Post {
            status: PublicationStatus::Draft,
            ..
        }
    ));
}

#[test]
fn test_cancel_before_post() {
    let h = Harness::new();
    let mut coordinator = h.coordinator(Some(credential()), Some(my_blog()), text_item("Hi"));

    assert!(coordinator.cancel());
    assert_eq!(h.host.cancelled(), 1);
    assert!(matches!(coordinator.post(), Err(Error::InvalidState(_))));
    assert!(h.client.calls().is_empty());
}

#[test]
fn test_cancel_after_post_is_ignored() {
    let h = Harness::new();
    let mut coordinator = h.coordinator(Some(credential()), Some(my_blog()), text_item("Hi"));
    coordinator.post().unwrap();

    assert!(!coordinator.cancel());
    assert_eq!(h.host.cancelled(), 0);
    assert_eq!(h.client.post_calls(), 1);
}

#[test]
fn test_empty_share_posts_empty_content() {
    let h = Harness::new();
    let mut coordinator = h.coordinator(Some(credential()), Some(my_blog()), ShareItem::default());
    coordinator.post().unwrap();

    assert_eq!(
        h.client.calls()[0],
        PublishCall::Post {
            destination_id: 42,
            status: PublicationStatus::Publish,
            title: String::new(),
            body: String::new(),
        }
    );
}

#[test]
fn test_gate_aborts_without_credential() {
    let host = RecordingHost::default();
    assert_eq!(
        ExtensionLifecycleGate::enforce(None, &host),
        EntryDecision::MustAbort
    );
    assert_eq!(
        *host.notices.lock().unwrap(),
        vec![BlockingNotice::MISSING_ACCOUNT]
    );
    assert_eq!(host.cancelled(), 1);
    assert_eq!(host.completed(), 0);
}

#[test]
fn test_gate_proceeds_without_destination() {
    let host = RecordingHost::default();
    let c = credential();
    assert_eq!(
        ExtensionLifecycleGate::enforce(Some(&c), &host),
        EntryDecision::Proceed
    );
    assert!(!ExtensionLifecycleGate::can_proceed(Some(&c), None));
}
