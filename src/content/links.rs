//! Bare URL detection and anchoring

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// Bare links: `http(s)://...` or `www.` hosts, up to whitespace or markup
static RE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>"']+"#).expect("link regex is valid")
});

/// Existing `<a ...>...</a>` elements, label included
static RE_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<a\b[^>]*>.*?</a\s*>").expect("anchor regex is valid")
});

/// Characters that end a sentence rather than a link
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

/// Byte ranges of the bare links in `text`
///
/// Links anywhere inside an existing `<a>` element, in its attributes or
/// its label, are skipped.
pub fn find_links(text: &str) -> Vec<Range<usize>> {
    let anchors: Vec<Range<usize>> = RE_ANCHOR.find_iter(text).map(|m| m.range()).collect();
    RE_LINK
        .find_iter(text)
        .filter_map(|m| {
            let end = m.start() + trimmed_len(m.as_str());
            let in_attribute = text[..m.start()].ends_with("href=\"")
                || text[..m.start()].ends_with("href='");
            if end <= m.start() || in_attribute || anchors.iter().any(|a| a.contains(&m.start())) {
                None
            } else {
                Some(m.start()..end)
            }
        })
        .collect()
}

/// Wrap every bare link in `<a href="...">...</a>`
///
/// The visible link text is kept verbatim. `www.` links get an `http://`
/// scheme in the href.
pub fn anchor_links(text: &str) -> String {
    let links = find_links(text);
    if links.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + links.len() * 16);
    let mut cursor = 0;
    for range in links {
        let link = &text[range.clone()];
        out.push_str(&text[cursor..range.start]);
        out.push_str("<a href=\"");
        if !has_scheme(link) {
            out.push_str("http://");
        }
        out.push_str(link);
        out.push_str("\">");
        out.push_str(link);
        out.push_str("</a>");
        cursor = range.end;
    }
    out.push_str(&text[cursor..]);
    out
}

fn has_scheme(link: &str) -> bool {
    let lower = link.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Length of `link` once trailing punctuation and unbalanced `)` are dropped
fn trimmed_len(link: &str) -> usize {
    let mut candidate = link;
    loop {
        if let Some(stripped) = candidate.strip_suffix(TRAILING_PUNCTUATION) {
            candidate = stripped;
            continue;
        }
        if candidate.ends_with(')')
            && candidate.matches(')').count() > candidate.matches('(').count()
        {
            candidate = &candidate[..candidate.len() - 1];
            continue;
        }
        break;
    }

    // A scheme or prefix alone is not a link
    let lower = candidate.to_ascii_lowercase();
    if matches!(lower.as_str(), "http://" | "https://" | "www.") {
        return 0;
    }
    candidate.len()
}
