//! CLI command implementations

mod auth;
mod host;
mod post;
mod progress;
mod resume;
mod sites;
mod style;

pub use auth::run_auth;
pub use host::CliHost;
pub use post::{PostOptions, run_post};
pub use progress::CliProgress;
pub use resume::run_resume;
pub use sites::run_sites;
