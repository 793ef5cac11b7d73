//! WordPress.com REST implementation of [`PublishClient`]

use crate::error::Result;
use crate::publish::{OutcomeHandler, PublishClient};
use crate::share::OutcomeListener;
use crate::transport::{
    TransferBody, TransferFailure, TransferRequest, TransferResult, TransportSession,
};
use crate::types::{AssetKind, PublicationStatus, UploadError, UploadErrorKind, UploadOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Transfer tag of post uploads
pub const POST_TAG: &str = "post";

/// Transfer tag of media uploads
pub const MEDIA_TAG: &str = "media";

/// Multipart field the media endpoint reads
const MEDIA_FIELD: &str = "media[]";

#[derive(Serialize)]
struct CreatePostPayload<'a> {
    title: &'a str,
    content: &'a str,
    status: PublicationStatus,
}

#[derive(Deserialize)]
struct PostResponse {
    #[serde(rename = "ID")]
    id: u64,
    #[serde(rename = "URL")]
    url: Option<String>,
}

#[derive(Deserialize)]
struct MediaResponse {
    #[serde(default)]
    media: Vec<MediaItem>,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct MediaItem {
    #[serde(rename = "ID")]
    id: u64,
    #[serde(rename = "URL")]
    url: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: Option<String>,
    message: Option<String>,
}

/// Publish client speaking the WordPress.com REST API over a
/// [`TransportSession`]
#[derive(Clone)]
pub struct WpcomPublishClient {
    session: TransportSession,
}

impl WpcomPublishClient {
    /// Create a client on top of `session`
    pub const fn new(session: TransportSession) -> Self {
        Self { session }
    }

    /// Underlying transport session
    pub const fn session(&self) -> &TransportSession {
        &self.session
    }

    /// Finish uploads a previous activation of this session left behind,
    /// reporting their outcomes to `listener`
    ///
    /// Returns the number of resumed uploads.
    pub fn resume(&self, listener: Arc<dyn OutcomeListener>) -> Result<usize> {
        let handles = self.session.resume_pending(move |request, result| {
            let asset = if request.tag == MEDIA_TAG {
                AssetKind::Image
            } else {
                AssetKind::Text
            };
            listener.on_outcome(&interpret(asset, result));
        })?;
        Ok(handles.len())
    }
}

impl PublishClient for WpcomPublishClient {
    fn create_post(
        &self,
        destination_id: u64,
        status: PublicationStatus,
        title: &str,
        body: &str,
        on_complete: OutcomeHandler,
    ) {
        debug!(site_id = destination_id, %status, "creating post");
        let payload = CreatePostPayload {
            title,
            content: body,
            status,
        };
        let value = match serde_json::to_value(&payload) {
            Ok(value) => value,
            Err(e) => {
                on_complete(UploadOutcome::failed(
                    AssetKind::Text,
                    UploadError::new(UploadErrorKind::Protocol, e.to_string()),
                ));
                return;
            }
        };

        let request = TransferRequest {
            tag: POST_TAG.to_string(),
            path: format!("sites/{destination_id}/posts/new"),
            body: TransferBody::Json { value },
        };
        self.session.enqueue(request, move |result| {
            on_complete(interpret(AssetKind::Text, result));
        });
    }

    fn create_media(&self, destination_id: u64, image_location: &Url, on_complete: OutcomeHandler) {
        debug!(site_id = destination_id, image = %image_location, "uploading media");
        let request = TransferRequest {
            tag: MEDIA_TAG.to_string(),
            path: format!("sites/{destination_id}/media/new"),
            body: TransferBody::File {
                field: MEDIA_FIELD.to_string(),
                location: image_location.clone(),
                mime: guess_mime(image_location.path()),
            },
        };
        self.session.enqueue(request, move |result| {
            on_complete(interpret(AssetKind::Image, result));
        });
    }

    fn session_id(&self) -> &str {
        self.session.identifier()
    }
}

fn interpret(asset: AssetKind, result: TransferResult) -> UploadOutcome {
    let outcome = match result {
        Ok(response) => match asset {
            AssetKind::Text => parse_post(&response.body),
            AssetKind::Image => parse_media(&response.body),
        }
        .map_or_else(
            |error| UploadOutcome::failed(asset, error),
            |(id, url)| UploadOutcome::succeeded(asset, id.to_string(), url),
        ),
        Err(failure) => UploadOutcome::failed(asset, classify_failure(&failure)),
    };
    debug!(%asset, success = outcome.success, error = ?outcome.error_kind(), "upload finished");
    outcome
}

fn parse_post(body: &[u8]) -> std::result::Result<(u64, Option<String>), UploadError> {
    let post: PostResponse = serde_json::from_slice(body).map_err(|e| {
        UploadError::new(UploadErrorKind::Protocol, format!("unexpected post response: {e}"))
    })?;
    Ok((post.id, post.url))
}

fn parse_media(body: &[u8]) -> std::result::Result<(u64, Option<String>), UploadError> {
    let response: MediaResponse = serde_json::from_slice(body).map_err(|e| {
        UploadError::new(UploadErrorKind::Protocol, format!("unexpected media response: {e}"))
    })?;
    response
        .media
        .into_iter()
        .next()
        .map(|item| (item.id, item.url))
        .ok_or_else(|| {
            let detail = if response.errors.is_empty() {
                "no media in response".to_string()
            } else {
                format!("media rejected: {}", serde_json::Value::from(response.errors))
            };
            UploadError::new(UploadErrorKind::Protocol, detail)
        })
}

/// Map a transport failure to an upload error
///
/// 401/403 mean the token was rejected, 404 an unknown site, 5xx a server
/// failure; any other status is a protocol error.
pub fn classify_failure(failure: &TransferFailure) -> UploadError {
    match failure {
        TransferFailure::Unreachable(msg) => UploadError::new(UploadErrorKind::Network, msg.clone()),
        TransferFailure::Source(msg) => {
            UploadError::new(UploadErrorKind::AssetUnavailable, msg.clone())
        }
        TransferFailure::InvalidRequest(msg) => {
            UploadError::new(UploadErrorKind::Protocol, msg.clone())
        }
        TransferFailure::Status { status, body } => {
            let kind = match *status {
                401 | 403 => UploadErrorKind::Authorization,
                404 => UploadErrorKind::DestinationNotFound,
                500..=599 => UploadErrorKind::Server,
                _ => UploadErrorKind::Protocol,
            };
            UploadError::new(kind, describe_api_error(*status, body))
        }
    }
}

fn describe_api_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(ApiErrorResponse {
            error: Some(code),
            message: Some(message),
        }) => format!("HTTP {status} {code}: {message}"),
        Ok(ApiErrorResponse {
            error: Some(code), ..
        }) => format!("HTTP {status} {code}"),
        _ => format!("HTTP {status}"),
    }
}

/// Content type for an image path, by extension
pub fn guess_mime(path: &str) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
