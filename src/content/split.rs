//! Subject/body split

/// Split text at its first line break
///
/// Returns the text before the break and everything after it. `\r\n`
/// counts as a single break. Text without a break is all subject.
pub fn split_subject_and_body(text: &str) -> (&str, &str) {
    match text.find(['\n', '\r']) {
        Some(idx) => {
            let rest = &text[idx..];
            let skip = if rest.starts_with("\r\n") { 2 } else { 1 };
            (&text[..idx], &text[idx + skip..])
        }
        None => (text, ""),
    }
}
