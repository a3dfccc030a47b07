//! Documentation comment cleanup.

use std::sync::OnceLock;

use regex::Regex;

const HTML_TAG_PATTERN: &str =
    r"(?i)</?(p|br|li|ul|ol|h[1-6]|div|span|code|pre|b|i|em|strong|tt|a|img|table|thead|tbody|tr|td|th|hr)(\s+[^>]*)?/?>";

fn html_tags() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(HTML_TAG_PATTERN).expect("HTML tag pattern is valid"))
}

/// Description text of a documentation comment.
///
/// Comment decoration (`/**`, leading `*`) and HTML tags are removed, block
/// tag lines (`@param`, `@author`, ...) end the description, and whitespace
/// is collapsed to single spaces.
pub fn summary(doc: &str) -> String {
    let mut parts = Vec::new();
    for line in doc.lines() {
        let line = line
            .trim()
            .trim_start_matches("/**")
            .trim_end_matches("*/")
            .trim_start_matches('*')
            .trim();
        if line.starts_with('@') {
            break;
        }
        let cleaned = html_tags().replace_all(line, " ");
        let cleaned = cleaned.trim();
        if !cleaned.is_empty() {
            parts.push(cleaned.to_string());
        }
    }
    parts
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// First line of the description text, used as a title.
pub fn title(doc: &str) -> Option<String> {
    doc.lines()
        .map(|line| {
            line.trim()
                .trim_start_matches("/**")
                .trim_end_matches("*/")
                .trim_start_matches('*')
                .trim()
        })
        .take_while(|line| !line.starts_with('@'))
        .map(|line| html_tags().replace_all(line, " ").trim().to_string())
        .find(|line| !line.is_empty())
}
