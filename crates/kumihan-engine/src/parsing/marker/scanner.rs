use std::ops::Range;

use super::{
    cursor::Cursor,
    result::{MarkerForm, MarkerSpan, ParseResult, Piece},
};
use crate::messages::{Locale, Message};
use crate::parsing::keywords::{KeywordResolver, Resolution};

/// Half-width and full-width marker characters. They are equivalent but a
/// span must open and close with the same one.
pub const MARKER_CHARS: [char; 2] = ['#', '＃'];

/// A marker character right after this is part of a hex color.
const COLOR_PREFIX: &str = "color=";

pub fn is_marker_char(c: char) -> bool {
    MARKER_CHARS.contains(&c)
}

/// True for a line that is exactly a block terminator (`##` or `＃＃`).
pub fn is_block_close(line: &str) -> bool {
    matches!(line.trim(), "##" | "＃＃")
}

/// Local byte ranges of one inline span.
struct RawSpan {
    start: usize,
    body: Range<usize>,
    content: Range<usize>,
    end: usize,
}

/// Why a line that starts with a marker produced no span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerDefect {
    /// `# #...`: nothing between the first two markers.
    EmptyKeyword { offset: usize },
    /// A keyword marker with no closing `##`.
    Unterminated { offset: usize },
}

impl MarkerDefect {
    pub fn offset(self) -> usize {
        match self {
            MarkerDefect::EmptyKeyword { offset } | MarkerDefect::Unterminated { offset } => offset,
        }
    }

    pub fn message(self, line: usize, locale: Locale) -> String {
        match self {
            MarkerDefect::EmptyKeyword { offset } => {
                Message::EmptyKeywordSegment { line, offset }.render(locale)
            }
            MarkerDefect::Unterminated { offset } => {
                Message::UnterminatedMarker { line, offset }.render(locale)
            }
        }
    }
}

/// Single-pass scanner for `# keyword #content##` spans.
///
/// Scanning is pure: the same text always gives the same result, and a
/// scanner can be shared between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerScanner {
    locale: Locale,
}

impl MarkerScanner {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Scans `text`, reporting offsets relative to its start.
    pub fn scan(&self, text: &str) -> Option<ParseResult> {
        self.scan_at(text, 0)
    }

    /// Scans `text`, which starts at byte `base` of the document.
    ///
    /// Returns `None` when the text holds neither an inline span nor a
    /// block-opening marker.
    pub fn scan_at(&self, text: &str, base: usize) -> Option<ParseResult> {
        if text.trim().is_empty() {
            return None;
        }
        let spans = find_spans(text);
        if spans.is_empty() {
            return self.block_result(text, base);
        }
        Some(self.inline_result(text, base, spans))
    }

    fn inline_result(&self, text: &str, base: usize, spans: Vec<RawSpan>) -> ParseResult {
        let resolver = KeywordResolver::new(self.locale);
        let mut markers = vec![];
        let mut pieces = vec![];
        let mut combined = String::new();
        let mut all = Resolution::default();

        let mut last = 0;
        for span in &spans {
            let mut before = &text[last..span.start];
            if last == 0 {
                before = before.trim_start();
            }
            if !before.is_empty() {
                combined.push_str(before);
                pieces.push(Piece::Text(before.to_string()));
            }

            let body = &text[span.body.clone()];
            let content = text[span.content.clone()].trim();
            let resolution = resolver.resolve_marker(body, content);
            all.merge(resolution.clone());
            combined.push_str(content);

            pieces.push(Piece::Marked {
                marker: markers.len(),
                body: body.trim().to_string(),
                content: content.to_string(),
                resolution,
            });
            markers.push(MarkerSpan {
                offset: base + span.start,
                length: span.end - span.start,
                text: text[span.start..span.end].to_string(),
            });
            last = span.end;
        }
        let after = text[last..].trim_end();
        if !after.is_empty() {
            combined.push_str(after);
            pieces.push(Piece::Text(after.to_string()));
        }

        ParseResult {
            form: MarkerForm::Inline,
            markers,
            content: combined.trim().to_string(),
            keywords: all.keywords,
            attributes: all.attributes,
            errors: all.errors,
            pieces,
        }
    }

    fn block_result(&self, text: &str, base: usize) -> Option<ParseResult> {
        let trimmed = text.trim();
        let body = block_open(trimmed)?;
        let lead = text.len() - text.trim_start().len();
        let resolution = KeywordResolver::new(self.locale).resolve(body);
        Some(ParseResult {
            form: MarkerForm::Block,
            markers: vec![MarkerSpan {
                offset: base + lead,
                length: trimmed.len(),
                text: trimmed.to_string(),
            }],
            content: String::new(),
            keywords: resolution.keywords,
            attributes: resolution.attributes,
            errors: resolution.errors,
            pieces: vec![],
        })
    }
}

/// The keyword body of a block-opening line: `# body` or `# body #`.
pub fn block_open(line: &str) -> Option<&str> {
    let line = line.trim();
    let delims = delimiters(line);
    let body = match delims.as_slice() {
        [(0, open)] => &line[open.len_utf8()..],
        [(0, open), (j, close)] if open == close && j + close.len_utf8() == line.len() => {
            &line[open.len_utf8()..*j]
        }
        _ => return None,
    };
    let body = body.trim();
    (!body.is_empty()).then_some(body)
}

/// Explains why a line starting with a marker has no span.
///
/// Returns `None` if the line does not start with a marker.
pub fn diagnose(text: &str, base: usize) -> Option<MarkerDefect> {
    let trimmed = text.trim_start();
    let offset = base + text.len() - trimmed.len();
    let delims = delimiters(trimmed);
    let &(0, open) = delims.first()? else {
        return None;
    };
    let empty = delims
        .get(1)
        .is_some_and(|&(j, _)| trimmed[open.len_utf8()..j].trim().is_empty());
    Some(if empty {
        MarkerDefect::EmptyKeyword { offset }
    } else {
        MarkerDefect::Unterminated { offset }
    })
}

fn find_spans(text: &str) -> Vec<RawSpan> {
    let mut cur = Cursor::new(text, 0);
    let mut out = vec![];
    while !cur.eof() {
        if let Some(span) = try_span(&mut cur) {
            out.push(span);
            continue;
        }
        cur.bump();
    }
    out
}

/// Attempts an inline span at the cursor. The body closes at the nearest
/// opening character, so a marker of the other width is ordinary body text;
/// the content closes at the nearest doubled opening character. On failure
/// the cursor is restored.
fn try_span(cur: &mut Cursor<'_>) -> Option<RawSpan> {
    if !at_delimiter(cur) {
        return None;
    }
    let saved = cur.clone();
    let start = cur.i;
    let open = cur.bump()?;

    let body_start = cur.i;
    while !cur.eof() && !(at_delimiter(cur) && cur.peek() == Some(open)) {
        cur.bump();
    }
    let body = body_start..cur.i;
    if cur.peek() != Some(open) || cur.s[body.clone()].trim().is_empty() {
        *cur = saved;
        return None;
    }
    cur.bump();

    let close: String = [open, open].iter().collect();
    let content_start = cur.i;
    while !cur.eof() && !(at_delimiter(cur) && cur.starts_with(&close)) {
        cur.bump();
    }
    if cur.eof() {
        *cur = saved;
        return None;
    }
    let content = content_start..cur.i;
    cur.bump();
    cur.bump();

    Some(RawSpan {
        start,
        body,
        content,
        end: cur.i,
    })
}

fn at_delimiter(cur: &Cursor<'_>) -> bool {
    cur.peek().is_some_and(is_marker_char) && !cur.preceded_by(COLOR_PREFIX)
}

/// Byte positions of delimiter characters in `text`.
fn delimiters(text: &str) -> Vec<(usize, char)> {
    let mut cur = Cursor::new(text, 0);
    let mut out = vec![];
    while !cur.eof() {
        if at_delimiter(&cur)
            && let Some(c) = cur.peek()
        {
            out.push((cur.i, c));
        }
        cur.bump();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn scan(text: &str) -> Option<ParseResult> {
        MarkerScanner::new(Locale::En).scan(text)
    }

    #[test]
    fn inline_span() {
        let r = scan("# 太字 #重要##").unwrap();
        assert_eq!(r.form, MarkerForm::Inline);
        assert_eq!(r.keywords, vec!["太字"]);
        assert_eq!(r.content, "重要");
        assert_eq!(
            r.markers,
            vec![MarkerSpan {
                offset: 0,
                length: 18,
                text: "# 太字 #重要##".to_string(),
            }]
        );
        assert!(r.errors.is_empty());
    }

    #[test]
    fn full_width_span() {
        let r = scan("＃太字＃重要＃＃").unwrap();
        assert_eq!(r.keywords, vec!["太字"]);
        assert_eq!(r.content, "重要");
        assert_eq!(r.markers[0].length, 24);
    }

    #[rstest]
    #[case("# 太字 ＃重要＃＃")]
    #[case("＃ 太字 #重要##")]
    #[case("# 太字 #重要＃＃")]
    fn mixed_widths_do_not_match(#[case] text: &str) {
        assert_eq!(scan(text), None);
    }

    #[test]
    fn other_width_marker_stays_in_body() {
        let r = scan("# 太字＃ #x##").unwrap();
        assert_eq!(r.form, MarkerForm::Inline);
        assert_eq!(r.keywords, vec!["太字＃"]);
        assert_eq!(r.content, "x");
        assert_eq!(r.markers[0].length, "# 太字＃ #x##".len());
    }

    #[test]
    fn surrounding_text_is_kept() {
        let r = scan("前 # 太字 #重要## 後").unwrap();
        assert_eq!(r.content, "前 重要 後");
        assert_eq!(r.markers[0].offset, "前 ".len());
        assert!(matches!(&r.pieces[0], Piece::Text(t) if t == "前 "));
        assert!(matches!(&r.pieces[1], Piece::Marked { marker: 0, content, .. } if content == "重要"));
        assert!(matches!(&r.pieces[2], Piece::Text(t) if t == " 後"));
    }

    #[test]
    fn several_spans_on_one_line() {
        let r = scan("# 太字 #a## と # 下線 #b##").unwrap();
        assert_eq!(r.keywords, vec!["太字", "下線"]);
        assert_eq!(r.content, "a と b");
        assert_eq!(r.markers.len(), 2);
        assert!(r.markers[0].end() <= r.markers[1].offset);
    }

    #[test]
    fn content_closes_at_nearest_terminator() {
        let r = scan("# 太字 #a## b ##").unwrap();
        assert_eq!(r.markers.len(), 1);
        assert_eq!(r.content, "a b ##");
    }

    #[test]
    fn hex_color_is_not_a_delimiter() {
        let r = scan("# 太字 color=#f00 #x##").unwrap();
        assert_eq!(r.keywords, vec!["太字"]);
        assert_eq!(r.attributes["color"], "#f00");
        assert_eq!(r.content, "x");
    }

    #[test]
    fn compound_keywords_share_content() {
        let r = scan("# 太字+下線 #内容##").unwrap();
        assert_eq!(r.keywords, vec!["太字", "下線"]);
        assert_eq!(r.content, "内容");
    }

    #[test]
    fn ruby_takes_notation_from_content() {
        let r = scan("# ルビ #漢字(かんじ)##").unwrap();
        assert_eq!(r.keywords, vec!["ルビ"]);
        assert_eq!(r.attributes["ruby_base"], "漢字");
        assert_eq!(r.attributes["ruby_text"], "かんじ");
    }

    #[test]
    fn resolution_errors_are_collected() {
        let r = scan("# 太字 余分 #x##").unwrap();
        assert_eq!(r.keywords, vec!["太字"]);
        assert_eq!(r.errors, vec!["Unexpected text '余分' in marker"]);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("plain text")]
    #[case("# #x##")]
    #[case("# 太字 #x")]
    #[case("# a # b # c #")]
    #[case("##")]
    fn no_span(#[case] text: &str) {
        assert_eq!(scan(text), None);
    }

    #[rstest]
    #[case("# 見出し1", "見出し1")]
    #[case("＃ 見出し1 ＃", "見出し1")]
    #[case("# 太字 color=#f00 #", "太字")]
    fn block_open_forms(#[case] text: &str, #[case] keyword: &str) {
        let r = scan(text).unwrap();
        assert_eq!(r.form, MarkerForm::Block);
        assert_eq!(r.keywords, vec![keyword]);
        assert_eq!(r.content, "");
        assert!(r.pieces.is_empty());
    }

    #[test]
    fn block_marker_skips_indentation() {
        let r = MarkerScanner::default().scan_at("  # 枠線 #  ", 100).unwrap();
        assert_eq!(r.markers[0].offset, 102);
        assert_eq!(r.markers[0].text, "# 枠線 #");
    }

    #[test]
    fn scan_at_offsets_are_absolute() {
        let r = MarkerScanner::default().scan_at("x # 太字 #y##", 50).unwrap();
        assert_eq!(r.markers[0].offset, 52);
    }

    #[rstest]
    #[case("# 太字", Some("太字"))]
    #[case("# 太字 #", Some("太字"))]
    #[case("  ＃枠線  ", Some("枠線"))]
    #[case("##", None)]
    #[case("# ", None)]
    #[case("# 太字 ＃", None)]
    #[case("text # 太字", None)]
    #[case("# 太字 #x##", None)]
    fn block_open_lines(#[case] line: &str, #[case] expected: Option<&str>) {
        assert_eq!(block_open(line), expected);
    }

    #[rstest]
    #[case("# #x##", Some(MarkerDefect::EmptyKeyword { offset: 0 }))]
    #[case("＃＃x", Some(MarkerDefect::EmptyKeyword { offset: 0 }))]
    #[case("# 太字 #x", Some(MarkerDefect::Unterminated { offset: 0 }))]
    #[case("  # 太字 #x", Some(MarkerDefect::Unterminated { offset: 2 }))]
    #[case("text # 太字", None)]
    fn diagnoses(#[case] text: &str, #[case] expected: Option<MarkerDefect>) {
        assert_eq!(diagnose(text, 0), expected);
    }

    #[test]
    fn defect_messages_carry_position() {
        let defect = MarkerDefect::EmptyKeyword { offset: 12 };
        assert_eq!(
            defect.message(3, Locale::En),
            "line 3, byte 12: marker has an empty keyword"
        );
        assert_eq!(defect.offset(), 12);
    }

    #[rstest]
    #[case("##", true)]
    #[case(" ＃＃ ", true)]
    #[case("#＃", false)]
    #[case("###", false)]
    fn block_close_lines(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(is_block_close(line), expected);
    }
}
