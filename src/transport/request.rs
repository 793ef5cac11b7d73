//! Transfer request and result types

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// One upload handed to the background transport
///
/// Uploads are always POSTed. `path` is resolved against the session's API
/// base, and credentials are attached by the session at send time, so a
/// request can be spooled to disk without leaking the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Caller-defined label used to interpret resumed results
    pub tag: String,
    /// Endpoint path relative to the API base
    pub path: String,
    /// Request payload
    pub body: TransferBody,
}

/// Upload payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransferBody {
    /// JSON document
    Json {
        /// Document to send
        value: serde_json::Value,
    },
    /// Local file sent as a single multipart field, read at send time
    File {
        /// Multipart field name
        field: String,
        /// `file://` location of the data
        location: Url,
        /// Content type of the file
        mime: String,
    },
}

/// Successful (2xx) response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: Vec<u8>,
}

/// Why a transfer did not produce a 2xx response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferFailure {
    /// Network unreachable, timeout, or connection dropped
    Unreachable(String),
    /// Server answered with a non-2xx status
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, lossily decoded
        body: String,
    },
    /// The local file to upload could not be read
    Source(String),
    /// The request could not be built
    InvalidRequest(String),
}

impl fmt::Display for TransferFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable(msg) => write!(f, "unreachable: {msg}"),
            Self::Status { status, .. } => write!(f, "HTTP {status}"),
            Self::Source(msg) => write!(f, "cannot read upload: {msg}"),
            Self::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
        }
    }
}

/// Result delivered to a transfer's completion handler
pub type TransferResult = Result<TransferResponse, TransferFailure>;
