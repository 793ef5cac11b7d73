//! press-share - share text and images to a WordPress.com site
//!
//! Library for the upload side of a share action: format the shared text,
//! gate on credentials and destination, then hand the post and the optional
//! image to a background transport that keeps going after the sharing
//! process is gone.

pub mod auth;
pub mod config;
pub mod content;
pub mod error;
pub mod publish;
pub mod share;
pub mod transport;
pub mod types;

pub use error::{Error, Result};
