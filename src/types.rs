//! Core types shared across the share pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Access credential for the publishing service
///
/// Produced by the credential store; read-only to the rest of the crate.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Bearer token sent with every request
    pub access_token: String,
    /// Account the token belongs to, when known
    pub account_name: Option<String>,
}

impl Credential {
    /// Create a credential from a token and optional account name
    pub fn new(access_token: impl Into<String>, account_name: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            account_name,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("account_name", &self.account_name)
            .finish()
    }
}

/// Remote site a post is published to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// Numeric site id
    pub id: u64,
    /// Human readable site name
    #[serde(alias = "name")]
    pub display_name: String,
}

impl Destination {
    /// Create a destination
    pub fn new(id: u64, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

/// Publication status of the created post
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    /// Saved as a draft
    Draft,
    /// Published immediately
    #[default]
    Publish,
}

impl PublicationStatus {
    /// Every status the picker offers, in display order
    pub const ALL: [Self; 2] = [Self::Draft, Self::Publish];

    /// Wire value sent to the API
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Publish => "publish",
        }
    }

    /// Label shown in the status picker
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Publish => "Publish",
        }
    }
}

impl fmt::Display for PublicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PublicationStatus {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "publish" => Ok(Self::Publish),
            other => Err(crate::error::Error::InvalidArgument(format!(
                "unknown post status '{other}', expected 'draft' or 'publish'"
            ))),
        }
    }
}

/// Payload handed over by the host application
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareItem {
    /// Shared text, possibly already ending in a source URL line
    pub raw_text: Option<String>,
    /// Location of the single shared image
    pub image_location: Option<Url>,
}

impl ShareItem {
    /// Create a share item
    pub const fn new(raw_text: Option<String>, image_location: Option<Url>) -> Self {
        Self {
            raw_text,
            image_location,
        }
    }
}

/// Title and body derived from the shared text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedContent {
    /// Post title (subject)
    pub title: String,
    /// Post body, with links anchored
    pub body: String,
}

/// A fully validated submission
///
/// Can only be built from a [`Credential`] and a [`Destination`], so a
/// request without both cannot exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    destination: Destination,
    status: PublicationStatus,
    content: FormattedContent,
    image_location: Option<Url>,
}

impl SubmissionRequest {
    pub(crate) fn new(
        _credential: &Credential,
        destination: Destination,
        status: PublicationStatus,
        content: FormattedContent,
        image_location: Option<Url>,
    ) -> Self {
        Self {
            destination,
            status,
            content,
            image_location,
        }
    }

    /// Target site
    pub const fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Status for the created post
    pub const fn status(&self) -> PublicationStatus {
        self.status
    }

    /// Formatted title and body
    pub const fn content(&self) -> &FormattedContent {
        &self.content
    }

    /// Image to upload alongside the post
    pub const fn image_location(&self) -> Option<&Url> {
        self.image_location.as_ref()
    }
}

/// Which submission precondition is unmet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreconditionFailure {
    /// No access credential
    MissingCredential,
    /// No destination site chosen
    MissingDestination,
}

impl fmt::Display for PreconditionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential => write!(f, "missing credential"),
            Self::MissingDestination => write!(f, "missing destination"),
        }
    }
}

/// Kind of asset submitted independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// The text post
    Text,
    /// The image upload
    Image,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "post"),
            Self::Image => write!(f, "image"),
        }
    }
}

/// Classification of an asynchronous upload failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadErrorKind {
    /// Transport-level failure (unreachable, timeout, connection reset)
    Network,
    /// Token rejected by the service
    Authorization,
    /// Destination site does not exist or is not accessible
    DestinationNotFound,
    /// Service failed with a 5xx response
    Server,
    /// Unexpected status or unparsable response body
    Protocol,
    /// The local image could not be read
    AssetUnavailable,
}

impl fmt::Display for UploadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "network failure"),
            Self::Authorization => write!(f, "authorization failure"),
            Self::DestinationNotFound => write!(f, "destination not found"),
            Self::Server => write!(f, "server error"),
            Self::Protocol => write!(f, "protocol error"),
            Self::AssetUnavailable => write!(f, "asset unavailable"),
        }
    }
}

/// Failure detail carried by an [`UploadOutcome`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadError {
    /// Failure classification
    pub kind: UploadErrorKind,
    /// Detail for logs
    pub message: String,
}

impl UploadError {
    /// Create an upload error
    pub fn new(kind: UploadErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Result of one asset's submission, delivered asynchronously
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    /// Which asset this outcome belongs to
    pub asset: AssetKind,
    /// Whether the remote service accepted the asset
    pub success: bool,
    /// Identifier assigned by the service
    pub remote_id: Option<String>,
    /// Public URL of the created asset, when returned
    pub remote_url: Option<String>,
    /// Failure detail when `success` is false
    pub error: Option<UploadError>,
    /// When the outcome was produced
    pub completed_at: DateTime<Utc>,
}

impl UploadOutcome {
    /// Successful outcome
    pub fn succeeded(asset: AssetKind, remote_id: String, remote_url: Option<String>) -> Self {
        Self {
            asset,
            success: true,
            remote_id: Some(remote_id),
            remote_url,
            error: None,
            completed_at: Utc::now(),
        }
    }

    /// Failed outcome
    pub fn failed(asset: AssetKind, error: UploadError) -> Self {
        Self {
            asset,
            success: false,
            remote_id: None,
            remote_url: None,
            error: Some(error),
            completed_at: Utc::now(),
        }
    }

    /// Failure classification, if any
    pub fn error_kind(&self) -> Option<UploadErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }
}
