//! Shared text formatting
//!
//! Turns the raw shared text into a title and an HTML body:
//! 1. bare URLs are wrapped in anchor markup
//! 2. the first line becomes the title, the rest the body
//!
//! When the first line itself carries a link the text is not split; the
//! title stays empty and everything goes to the body, so links always end
//! up in the body. Formatting never fails; missing text yields an empty
//! title and body.

mod links;
mod split;

pub use links::{anchor_links, find_links};
pub use split::split_subject_and_body;

use crate::types::FormattedContent;
use url::Url;

/// Format raw shared text into a title and body
pub fn format_content(raw_text: Option<&str>) -> FormattedContent {
    let Some(raw) = raw_text else {
        return FormattedContent::default();
    };

    let anchored = anchor_links(raw);
    let (subject, body) = split_subject_and_body(&anchored);

    if subject.contains("<a ") {
        return FormattedContent {
            title: String::new(),
            body: anchored,
        };
    }

    FormattedContent {
        title: subject.trim().to_string(),
        body: body.to_string(),
    }
}

/// Append the shared page URL to the shared text
///
/// The URL goes on its own paragraph when there is text before it.
pub fn compose_share_text(text: Option<&str>, source_url: Option<&Url>) -> Option<String> {
    let current = text.unwrap_or_default();
    let Some(url) = source_url else {
        return text.map(ToString::to_string);
    };

    let spacing = if current.is_empty() { "" } else { "\n\n" };
    Some(format!("{current}{spacing}{url}"))
}
