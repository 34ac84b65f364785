//! Markup clean-up for free-text fields such as descriptions and hints.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn code_re() -> &'static Regex {
    static CODE_RE: OnceLock<Regex> = OnceLock::new();
    CODE_RE.get_or_init(|| Regex::new(r"(?is)<code>(.*?)</code>").expect("valid code regex"))
}

fn bold_re() -> &'static Regex {
    static BOLD_RE: OnceLock<Regex> = OnceLock::new();
    BOLD_RE.get_or_init(|| {
        Regex::new(r"(?is)<(?:b|strong)>(.*?)</(?:b|strong)>").expect("valid bold regex")
    })
}

fn line_break_re() -> &'static Regex {
    static LINE_BREAK_RE: OnceLock<Regex> = OnceLock::new();
    LINE_BREAK_RE
        .get_or_init(|| Regex::new(r"(?i)<br\s*/?>|\r?\n|\r").expect("valid line break regex"))
}

fn anchor_re() -> &'static Regex {
    static ANCHOR_RE: OnceLock<Regex> = OnceLock::new();
    ANCHOR_RE.get_or_init(|| Regex::new(r"(?is)<a\b[^>]*>(.*?)</a>").expect("valid anchor regex"))
}

fn tag_re() -> &'static Regex {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    TAG_RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid tag regex"))
}

/// Converts embedded markup into plain text.
///
/// Passes run in a fixed order: `<code>` becomes backticks, `<b>`/`<strong>` become
/// `**`, line breaks (markup or literal) become single spaces, links collapse to their
/// text, and whatever tags remain are dropped. The result is trimmed.
///
/// Sanitizing already-sanitized text returns it unchanged.
pub fn sanitize_text(text: &str) -> String {
    let text = code_re().replace_all(text, "`$1`");
    let text = bold_re().replace_all(&text, "**$1**");
    let text = line_break_re().replace_all(&text, " ");
    let text = anchor_re().replace_all(&text, "$1");
    let text = tag_re().replace_all(&text, "");
    text.trim().to_string()
}

/// Sanitizes a JSON value that may or may not be a string. Anything else yields an
/// empty string.
pub fn sanitize_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => sanitize_text(text),
        _ => String::new(),
    }
}
