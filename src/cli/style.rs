//! Terminal styling helpers

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;

/// Semantic text styles
pub trait Stylize {
    /// Values the user should notice (names, ids, commands)
    fn accent(&self) -> String;
    /// Secondary information
    fn muted(&self) -> String;
    /// Headings
    fn emphasis(&self) -> String;
}

impl<T: AsRef<str> + ?Sized> Stylize for T {
    fn accent(&self) -> String {
        self.as_ref().cyan().to_string()
    }

    fn muted(&self) -> String {
        self.as_ref().dimmed().to_string()
    }

    fn emphasis(&self) -> String {
        self.as_ref().bold().to_string()
    }
}

/// Success marker
pub fn check() -> String {
    "✓".green().to_string()
}

/// Failure marker
pub fn cross() -> String {
    "✗".red().to_string()
}

/// Spinner used while waiting on the network
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Clickable link when the terminal supports it, the bare URL otherwise
pub fn hyperlink(text: &str, url: &str) -> String {
    if supports_hyperlinks::on(supports_hyperlinks::Stream::Stdout) {
        terminal_link::Link::new(text, url).to_string()
    } else {
        url.to_string()
    }
}
