//! Publishing client
//!
//! Translates "create this post" and "upload this image" into background
//! transfers and turns the transfer results back into [`UploadOutcome`]s.

mod wpcom;

pub use wpcom::{MEDIA_TAG, POST_TAG, WpcomPublishClient, classify_failure, guess_mime};

use crate::types::{PublicationStatus, UploadOutcome};
use url::Url;

/// Callback receiving the outcome of one submitted asset
pub type OutcomeHandler = Box<dyn FnOnce(UploadOutcome) + Send + 'static>;

/// Client for the remote publishing API
///
/// Both operations are fire-and-forget: they return once the work is handed
/// to the transport, and the outcome arrives later through `on_complete`.
/// Nothing here retries; every failure is reported exactly once.
pub trait PublishClient: Send + Sync {
    /// Create a post on `destination_id`
    fn create_post(
        &self,
        destination_id: u64,
        status: PublicationStatus,
        title: &str,
        body: &str,
        on_complete: OutcomeHandler,
    );

    /// Upload the image at `image_location` to the media library of
    /// `destination_id`
    fn create_media(&self, destination_id: u64, image_location: &Url, on_complete: OutcomeHandler);

    /// Identifier of the transport session uploads go through
    fn session_id(&self) -> &str;
}
