use std::collections::BTreeMap;

use super::attributes::{
    escape_attribute, extract_color, extract_size, extract_style, is_dangerous_scheme, take_named,
};
use super::ruby::{RUBY_KEYWORD, parse_ruby};
use crate::messages::{Locale, Message};

/// Longest keyword accepted, in characters.
pub const MAX_KEYWORD_LEN: usize = 50;

const FORBIDDEN_CHARS: &[char] = &['<', '>', '"', '\'', '&'];

const RESERVED_PREFIXES: &[&str] = &["javascript:", "vbscript:", "data:"];

const RESERVED_WORDS: &[&str] = &["script", "style", "iframe"];

/// Separators joining compound keywords (`太字+下線`).
pub const COMPOUND_SEPARATORS: [char; 2] = ['+', '＋'];

/// Keywords and attributes found in one marker body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Keyword texts in marker order; duplicates are kept.
    pub keywords: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub errors: Vec<String>,
}

impl Resolution {
    /// Folds `other` into `self`. Attributes are last-write-wins.
    pub fn merge(&mut self, other: Resolution) {
        self.keywords.extend(other.keywords);
        self.attributes.extend(other.attributes);
        self.errors.extend(other.errors);
    }
}

/// Splits marker bodies into primitive keywords and attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordResolver {
    locale: Locale,
}

impl KeywordResolver {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Resolves a marker body such as `太字+下線 color=red`.
    ///
    /// `ルビ` with nothing after it resolves to the bare keyword; the notation
    /// is then expected in the marker content (see [`Self::resolve_marker`]).
    pub fn resolve(&self, body: &str) -> Resolution {
        let body = body.trim();
        let mut out = Resolution::default();
        if body.is_empty() {
            out.errors.push(self.msg(Message::EmptyKeyword));
            return out;
        }

        let (primary, rest) = split_first_token(body);
        if primary == RUBY_KEYWORD {
            if rest.is_empty() {
                out.keywords.push(RUBY_KEYWORD.to_string());
                return out;
            }
            return self.resolve_ruby(rest);
        }

        let remainder = self.take_attributes(body, &mut out);

        let mut tokens = remainder.split_whitespace();
        let Some(keyword_text) = tokens.next() else {
            out.errors.push(self.msg(Message::EmptyKeyword));
            return out;
        };
        let leftover: Vec<&str> = tokens.collect();
        if !leftover.is_empty() {
            let text = leftover.join(" ");
            out.errors.push(self.msg(Message::UnexpectedText { text: &text }));
        }

        for (index, part) in keyword_text.split(COMPOUND_SEPARATORS).enumerate() {
            let part = part.trim();
            if part.is_empty() {
                out.errors.push(self.msg(Message::CompoundEmptyPart {
                    position: index + 1,
                }));
                continue;
            }
            match self.check_shape(part) {
                Ok(()) => out.keywords.push(part.to_string()),
                Err(e) => out.errors.push(e),
            }
        }
        out
    }

    /// Resolves a marker body together with its content, so that
    /// `# ルビ #漢字(かんじ)##` takes the ruby notation from the content.
    pub fn resolve_marker(&self, body: &str, content: &str) -> Resolution {
        let (primary, rest) = split_first_token(body.trim());
        if primary == RUBY_KEYWORD && rest.is_empty() {
            return self.resolve_ruby(content);
        }
        self.resolve(body)
    }

    /// Checks the shape of a single keyword: length, characters, not numeric,
    /// not reserved.
    pub fn check_shape(&self, keyword: &str) -> Result<(), String> {
        if keyword.chars().count() > MAX_KEYWORD_LEN {
            return Err(self.msg(Message::KeywordTooLong {
                keyword,
                max: MAX_KEYWORD_LEN,
            }));
        }
        if keyword.contains(FORBIDDEN_CHARS) {
            return Err(self.msg(Message::KeywordForbiddenChars { keyword }));
        }
        if keyword.chars().all(char::is_numeric) {
            return Err(self.msg(Message::KeywordNumeric { keyword }));
        }
        let lower = keyword.to_lowercase();
        if RESERVED_PREFIXES.iter().any(|p| lower.starts_with(p))
            || RESERVED_WORDS.contains(&lower.as_str())
        {
            return Err(self.msg(Message::KeywordReserved { keyword }));
        }
        Ok(())
    }

    fn resolve_ruby(&self, source: &str) -> Resolution {
        let mut out = Resolution::default();
        let safe = parse_ruby(source).and_then(|ruby| {
            let base = escape_attribute(&ruby.base);
            let text = escape_attribute(&ruby.text);
            (!is_dangerous_scheme(&base) && !is_dangerous_scheme(&text)).then_some((base, text))
        });
        match safe {
            Some((base, text)) => {
                out.keywords.push(RUBY_KEYWORD.to_string());
                out.attributes.insert("ruby_base".to_string(), base);
                out.attributes.insert("ruby_text".to_string(), text);
            }
            None => out.errors.push(self.msg(Message::InvalidRuby {
                text: source.trim(),
            })),
        }
        out
    }

    /// Removes `color=`, `size:` and `style:` from `body`, recording valid
    /// values as attributes and invalid ones as errors.
    fn take_attributes(&self, body: &str, out: &mut Resolution) -> String {
        let mut remainder = body.to_string();

        if let Some((raw, rest)) = take_named(&remainder, "color") {
            let (color, _) = extract_color(&remainder);
            self.record("color", &raw, (!color.is_empty()).then_some(color), out);
            remainder = rest;
        }
        if let Some((raw, rest)) = take_named(&remainder, "size") {
            self.record("size", &raw, extract_size(&remainder), out);
            remainder = rest;
        }
        if let Some((raw, rest)) = take_named(&remainder, "style") {
            self.record("style", &raw, extract_style(&remainder), out);
            remainder = rest;
        }
        remainder
    }

    fn record(&self, name: &str, raw: &str, value: Option<String>, out: &mut Resolution) {
        match value {
            Some(v) => {
                out.attributes.insert(name.to_string(), v);
            }
            None => out
                .errors
                .push(self.msg(Message::InvalidAttribute { name, value: raw })),
        }
    }

    fn msg(&self, message: Message<'_>) -> String {
        message.render(self.locale)
    }
}

/// Splits on the first whitespace run into `(primary_token, rest)`.
fn split_first_token(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim_start()),
        None => (s, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn resolve(body: &str) -> Resolution {
        KeywordResolver::new(Locale::En).resolve(body)
    }

    #[test]
    fn single_keyword() {
        let r = resolve("太字");
        assert_eq!(r.keywords, vec!["太字"]);
        assert!(r.attributes.is_empty());
        assert!(r.errors.is_empty());
    }

    #[rstest]
    #[case("太字+下線", vec!["太字", "下線"])]
    #[case("太字＋下線＋イタリック", vec!["太字", "下線", "イタリック"])]
    #[case(" 太字 + 下線 ", vec!["太字"])]
    fn compound_keywords(#[case] body: &str, #[case] expected: Vec<&str>) {
        assert_eq!(resolve(body).keywords, expected);
    }

    #[test]
    fn spaced_compound_is_extra_text() {
        let r = resolve("太字 + 下線");
        assert_eq!(r.keywords, vec!["太字"]);
        assert_eq!(r.errors, vec!["Unexpected text '+ 下線' in marker"]);
    }

    #[rstest]
    #[case("太字++下線", 2)]
    #[case("+太字", 1)]
    #[case("太字+", 2)]
    fn compound_empty_part_is_reported(#[case] body: &str, #[case] position: usize) {
        let r = resolve(body);
        assert_eq!(
            r.errors,
            vec![format!(
                "compound keyword has an empty part at position {position}"
            )]
        );
        assert!(!r.keywords.is_empty());
    }

    #[test]
    fn duplicates_are_kept() {
        assert_eq!(resolve("太字+太字").keywords, vec!["太字", "太字"]);
    }

    #[test]
    fn color_attribute_is_extracted() {
        let r = resolve("太字 color=red");
        assert_eq!(r.keywords, vec!["太字"]);
        assert_eq!(r.attributes.get("color").map(String::as_str), Some("red"));
        assert!(r.errors.is_empty());
    }

    #[test]
    fn dangerous_color_is_neutralized_silently() {
        let r = resolve("太字 color=javascript:alert(1)");
        assert_eq!(r.attributes["color"], "#000000");
        assert!(r.errors.is_empty());
    }

    #[test]
    fn invalid_color_is_an_error_but_keyword_survives() {
        let r = resolve("太字 color=chartreuse");
        assert_eq!(r.keywords, vec!["太字"]);
        assert!(r.attributes.is_empty());
        assert_eq!(
            r.errors,
            vec!["Invalid value 'chartreuse' for attribute color"]
        );
    }

    #[test]
    fn size_and_style_attributes() {
        let r = resolve("太字 size:1.2em style:italic");
        assert_eq!(r.keywords, vec!["太字"]);
        assert_eq!(r.attributes["size"], "1.2em");
        assert_eq!(r.attributes["style"], "italic");
    }

    #[rstest]
    #[case("a".repeat(51), "too long")]
    #[case("太<字".to_string(), "forbidden characters")]
    #[case("12345".to_string(), "purely numeric")]
    #[case("１２".to_string(), "purely numeric")]
    #[case("javascript:x".to_string(), "reserved word")]
    #[case("SCRIPT".to_string(), "reserved word")]
    fn shape_violations(#[case] keyword: String, #[case] fragment: &str) {
        let r = resolve(&keyword);
        assert!(r.keywords.is_empty());
        assert_eq!(r.errors.len(), 1);
        assert!(r.errors[0].contains(fragment), "{}", r.errors[0]);
    }

    #[test]
    fn shape_violation_does_not_stop_siblings() {
        let r = resolve("123+太字");
        assert_eq!(r.keywords, vec!["太字"]);
        assert_eq!(r.errors.len(), 1);
    }

    #[test]
    fn fifty_chars_is_allowed() {
        assert!(
            KeywordResolver::default()
                .check_shape(&"字".repeat(50))
                .is_ok()
        );
    }

    #[test]
    fn ruby_in_rest() {
        let r = resolve("ルビ 漢字(かんじ)");
        assert_eq!(r.keywords, vec!["ルビ"]);
        assert_eq!(r.attributes["ruby_base"], "漢字");
        assert_eq!(r.attributes["ruby_text"], "かんじ");
    }

    #[test]
    fn ruby_from_content() {
        let r = KeywordResolver::default().resolve_marker("ルビ", "漢字（かんじ）");
        assert_eq!(r.keywords, vec!["ルビ"]);
        assert_eq!(r.attributes["ruby_text"], "かんじ");
    }

    #[rstest]
    #[case("ルビ", "javascript:alert(1)(x)")]
    #[case("ルビ", "漢字(DATA:text/html,x)")]
    #[case("ルビ vbscript:x(よみ)", "")]
    fn ruby_with_dangerous_scheme_is_rejected(#[case] body: &str, #[case] content: &str) {
        let r = KeywordResolver::new(Locale::En).resolve_marker(body, content);
        assert!(r.keywords.is_empty());
        assert!(r.attributes.is_empty());
        assert_eq!(r.errors.len(), 1);
        assert!(r.errors[0].starts_with("Invalid ruby notation"), "{}", r.errors[0]);
    }

    #[test]
    fn ruby_values_are_escaped() {
        let r = KeywordResolver::default().resolve_marker("ルビ", "a<b>(\"よみ\")");
        assert_eq!(r.attributes["ruby_base"], "a&lt;b&gt;");
        assert_eq!(r.attributes["ruby_text"], "&quot;よみ&quot;");
    }

    #[test]
    fn mixed_width_ruby_is_rejected() {
        let r = resolve("ルビ 漢(か（ん)");
        assert!(r.keywords.is_empty());
        assert_eq!(r.errors, vec!["Invalid ruby notation '漢(か（ん)'"]);
    }

    #[test]
    fn empty_body_is_an_error() {
        assert_eq!(resolve("   ").errors, vec!["Keyword is empty"]);
        assert_eq!(resolve("color=red").errors, vec!["Keyword is empty"]);
    }

    #[test]
    fn attributes_merge_last_write_wins() {
        let mut a = resolve("太字 color=red");
        a.merge(resolve("下線 color=blue"));
        assert_eq!(a.keywords, vec!["太字", "下線"]);
        assert_eq!(a.attributes["color"], "blue");
    }

    #[test]
    fn japanese_messages_by_default() {
        let r = KeywordResolver::default().resolve("太字++下線");
        assert_eq!(r.errors, vec!["複合キーワードの2番目が空です"]);
    }
}
