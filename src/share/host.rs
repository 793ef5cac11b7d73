//! Host application hooks

/// Notice the host must show before the session can go on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockingNotice {
    /// Alert title
    pub title: &'static str,
    /// Alert body
    pub message: &'static str,
    /// Label of the only action, which cancels the share
    pub action: &'static str,
}

impl BlockingNotice {
    /// Shown when no account is signed in
    pub const MISSING_ACCOUNT: Self = Self {
        title: "No WordPress.com Account",
        message: "Launch the WordPress app and sign into your WordPress.com or Jetpack site to share.",
        action: "Cancel Share",
    };
}

/// What the share flow needs from the application hosting it
pub trait HostContext: Send + Sync {
    /// Show a blocking notice; returns once the user acknowledged it
    fn present_notice(&self, notice: &BlockingNotice);

    /// The share request is complete; the host may tear down the UI
    fn complete_request(&self);

    /// The share request was cancelled; nothing was submitted
    fn cancel_request(&self);
}
