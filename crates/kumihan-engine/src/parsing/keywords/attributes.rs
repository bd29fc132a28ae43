//! Extraction and sanitization of `color=`, `size:` and `style:` attributes.

use std::sync::LazyLock;

use regex::Regex;

/// Replacement for any color value using a dangerous URL scheme.
pub const SAFE_COLOR: &str = "#000000";

const DANGEROUS_SCHEMES: &[&str] = &["javascript:", "data:", "vbscript:"];

const NAMED_COLORS: &[&str] = &[
    "red", "blue", "green", "yellow", "orange", "purple", "pink", "brown", "black", "white",
    "gray", "grey", "cyan", "magenta",
];

const SIZE_KEYWORDS: &[&str] = &["small", "medium", "large", "x-large", "xx-large"];

const STYLES: &[&str] = &[
    "normal",
    "italic",
    "bold",
    "underline",
    "strikethrough",
    "uppercase",
    "lowercase",
    "capitalize",
];

static COLOR_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"color=(\S*)").expect("valid color attribute regex"));

static SIZE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"size:\s*(\S*)").expect("valid size attribute regex"));

static STYLE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"style:\s*(\S*)").expect("valid style attribute regex"));

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid hex color regex")
});

static RGB_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^rgba?\(\s*\d{1,3}\s*,\s*\d{1,3}\s*,\s*\d{1,3}\s*(?:,\s*(?:0|1|0?\.\d+)\s*)?\)$",
    )
    .expect("valid rgb color regex")
});

static SIZE_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(?:\.\d+)?(?:px|em|rem|%|pt|vh|vw)$").expect("valid size regex")
});

/// True if `value` starts with a scheme that can execute or embed content.
pub fn is_dangerous_scheme(value: &str) -> bool {
    let lower = value.trim_start().to_lowercase();
    DANGEROUS_SCHEMES.iter().any(|s| lower.starts_with(s))
}

/// Neutralizes a color value before it reaches an attribute.
///
/// Trims, HTML-escapes `& < > " '`, and forces [`SAFE_COLOR`] when the result
/// uses a dangerous scheme. Entities already present are decoded first, so the
/// function is idempotent.
pub fn sanitize_color(value: &str) -> String {
    let escaped = escape_attribute(value);
    if is_dangerous_scheme(&escaped) {
        SAFE_COLOR.to_string()
    } else {
        escaped
    }
}

/// Trims and HTML-escapes an attribute value, decoding existing entities
/// first so escaping twice changes nothing.
pub fn escape_attribute(value: &str) -> String {
    let decoded = html_escape::decode_html_entities(value);
    html_escape::encode_quoted_attribute(decoded.trim()).into_owned()
}

/// True if `value` is an accepted color: 3/6-digit hex, `rgb(...)`,
/// `rgba(...)` or a named color.
pub fn is_valid_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
        || RGB_COLOR.is_match(value)
        || NAMED_COLORS.contains(&value.to_ascii_lowercase().as_str())
}

/// Pulls a `color=` attribute out of `text`.
///
/// Returns the sanitized color and the text with the attribute removed. When
/// no acceptable color is present the color is empty and `text` comes back
/// unchanged.
pub fn extract_color(text: &str) -> (String, String) {
    let Some(caps) = COLOR_ATTR.captures(text) else {
        return (String::new(), text.to_string());
    };
    let color = sanitize_color(&caps[1]);
    if !is_valid_color(&color) {
        return (String::new(), text.to_string());
    }
    (color, strip_match(text, caps.get(0)))
}

/// Returns the `size:` value when it is a number with a unit or a size keyword.
pub fn extract_size(text: &str) -> Option<String> {
    let value = SIZE_ATTR.captures(text)?.get(1)?.as_str().to_ascii_lowercase();
    (SIZE_VALUE.is_match(&value) || SIZE_KEYWORDS.contains(&value.as_str())).then_some(value)
}

/// Returns the `style:` value when it is one of the known styles.
pub fn extract_style(text: &str) -> Option<String> {
    let value = STYLE_ATTR.captures(text)?.get(1)?.as_str().to_ascii_lowercase();
    STYLES.contains(&value.as_str()).then_some(value)
}

/// A present `color=`/`size:`/`style:` attribute as `(raw value, text without it)`.
pub(crate) fn take_named(text: &str, name: &str) -> Option<(String, String)> {
    let re = match name {
        "color" => &*COLOR_ATTR,
        "size" => &*SIZE_ATTR,
        "style" => &*STYLE_ATTR,
        _ => return None,
    };
    let caps = re.captures(text)?;
    Some((caps[1].to_string(), strip_match(text, caps.get(0))))
}

fn strip_match(text: &str, m: Option<regex::Match<'_>>) -> String {
    match m {
        Some(m) => {
            let mut out = String::with_capacity(text.len());
            out.push_str(text[..m.start()].trim_end());
            let rest = text[m.end()..].trim_start();
            if !out.is_empty() && !rest.is_empty() {
                out.push(' ');
            }
            out.push_str(rest);
            out
        }
        None => text.to_string(),
    }
}
