//! Verse records returned by content providers

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static RE_HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<[^>]+>").expect("valid html tag regex"));

/// Entities the verse database is known to emit
const HTML_ENTITIES: &[(&str, &str)] = &[
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&nbsp;", " "),
    // Last, so "&amp;lt;" decodes to "&lt;" rather than "<"
    ("&amp;", "&"),
];

const PILCROW: char = '\u{00B6}';

/// A verse as stored by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verse {
    /// Human-readable reference, e.g. "John 3:16"
    pub reference: String,
    /// Raw content, possibly containing markup and a leading verse number
    pub content: String,
    /// Provider key, e.g. "JHN.3.16"
    pub id: String,
}

impl Verse {
    /// The verse number encoded in the id (`"JHN.3.16"` -> `"16"`)
    pub fn verse_number(&self) -> &str {
        self.id.rsplit('.').next().unwrap_or("")
    }

    /// Content as plain text without markup or the leading verse number
    pub fn cleaned_text(&self) -> String {
        let stripped = strip_html(&self.content);
        let stripped = stripped.trim();
        let stripped = stripped
            .strip_prefix(PILCROW)
            .map(str::trim_start)
            .unwrap_or(stripped);

        match self.verse_number().parse::<u32>() {
            Ok(number) => {
                let prefix = number.to_string();
                match stripped.strip_prefix(prefix.as_str()) {
                    // "12 tribes" in verse 1 is not a verse marker
                    Some(rest) if !rest.starts_with(|c: char| c.is_ascii_digit()) => {
                        rest.trim_start().to_string()
                    }
                    _ => stripped.to_string(),
                }
            }
            Err(_) => stripped.to_string(),
        }
    }
}

/// Remove tags and decode the handful of entities the provider emits
pub fn strip_html(text: &str) -> String {
    let mut stripped = RE_HTML_TAG.replace_all(text, "").into_owned();
    for (entity, replacement) in HTML_ENTITIES {
        stripped = stripped.replace(entity, replacement);
    }
    stripped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verse(id: &str, content: &str) -> Verse {
        Verse {
            reference: "John 3:16".to_string(),
            content: content.to_string(),
            id: id.to_string(),
        }
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p class=\"p\"><span>For God</span> so loved</p>"),
            "For God so loved"
        );
        assert_eq!(strip_html("&quot;Yes&quot; &amp; no"), "\"Yes\" & no");
        assert_eq!(strip_html("a&nbsp;b"), "a b");
        assert_eq!(strip_html("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_verse_number() {
        assert_eq!(verse("JHN.3.16", "").verse_number(), "16");
        assert_eq!(verse("odd", "").verse_number(), "odd");
    }

    #[test]
    fn test_cleaned_text_drops_verse_number() {
        let v = verse("JHN.3.16", "<p><span class=\"v\">16</span> For God so loved the world</p>");
        assert_eq!(v.cleaned_text(), "For God so loved the world");

        let v = verse("JHN.3.16", "16For God so loved the world");
        assert_eq!(v.cleaned_text(), "For God so loved the world");
    }

    #[test]
    fn test_cleaned_text_keeps_other_numbers() {
        let v = verse("GEN.1.1", "12 tribes");
        assert_eq!(v.cleaned_text(), "12 tribes");
    }

    #[test]
    fn test_cleaned_text_pilcrow() {
        let v = verse("PSA.23.1", "\u{00B6} The LORD is my shepherd");
        assert_eq!(v.cleaned_text(), "The LORD is my shepherd");
    }

    #[test]
    fn test_cleaned_text_non_numeric_id() {
        let v = verse("intro", "  <b>Hello</b>  ");
        assert_eq!(v.cleaned_text(), "Hello");
    }
}
