//! Common test utilities for press-share tests

pub mod fixtures;
pub mod mock_publish;

// Re-exports for convenience - not all test binaries use all exports
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mock_publish::{MockPublishClient, PublishCall};
