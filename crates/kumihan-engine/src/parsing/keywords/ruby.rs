use std::sync::LazyLock;

use regex::Regex;

/// Keyword that introduces ruby notation.
pub const RUBY_KEYWORD: &str = "ルビ";

static RUBY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)[(（](.+?)[)）]$").expect("valid ruby notation regex")
});

/// A base text with its reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ruby {
    pub base: String,
    pub text: String,
}

/// Parses `base(reading)` with half-width or full-width parentheses.
///
/// Content that contains both a half-width and a full-width opening paren is
/// ambiguous and rejected.
pub fn parse_ruby(content: &str) -> Option<Ruby> {
    let content = content.trim();
    if content.contains('(') && content.contains('（') {
        return None;
    }
    let caps = RUBY.captures(content)?;
    let base = caps[1].trim();
    let text = caps[2].trim();
    if base.is_empty() || text.is_empty() {
        return None;
    }
    Some(Ruby {
        base: base.to_string(),
        text: text.to_string(),
    })
}
