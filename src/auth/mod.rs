//! Credential and destination lookup
//!
//! The main app owns sign-in; this crate only reads what it left behind,
//! either from the environment or from the shared credential file.

mod store;
mod wpcom;

pub use store::{CredentialStore, SharedCredentialStore, TOKEN_ENV, USERNAME_ENV};
pub use wpcom::{list_sites, test_auth};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from environment variable
    EnvVar,
    /// Token from the credential file shared with the main app
    SharedStore,
}
