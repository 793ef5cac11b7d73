//! Error types for press-share

use crate::types::PreconditionFailure;
use thiserror::Error;

/// Errors raised synchronously by the library
///
/// Failures of individual uploads are not errors in this sense: they are
/// delivered asynchronously as [`UploadOutcome`](crate::types::UploadOutcome)
/// values.
#[derive(Error, Debug)]
pub enum Error {
    /// No access credential is available
    #[error("no WordPress.com account available; sign in from the app first")]
    MissingCredential,

    /// No destination site has been chosen
    #[error("no destination site selected")]
    MissingDestination,

    /// Submission was attempted while its preconditions were unmet
    #[error("submission attempted with unmet precondition: {0}")]
    ContractViolation(PreconditionFailure),

    /// Operation not allowed in the current session state
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Authentication error
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Remote API error outside of the background transport
    #[error("API error: {0}")]
    Api(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parse error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias for press-share operations
pub type Result<T> = std::result::Result<T, Error>;
