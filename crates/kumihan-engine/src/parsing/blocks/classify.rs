use crate::parsing::marker::{block_open, is_block_close, is_marker_char};
use crate::parsing::rope::LineRef;

/// Local facts about one line, decided without looking at its neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    /// `##` or `＃＃`.
    BlockClose,
    /// `# kw` or `# kw #` alone on the line.
    BlockOpen { body: String },
    /// `- `, `* `, `・` or `N. ` item.
    ListItem { ordered: bool },
    /// Starts with a marker character but does not open a block.
    Marked,
    Text,
}

/// A line with its classification.
#[derive(Debug, Clone)]
pub struct LineClass {
    pub kind: LineKind,
    pub line: LineRef,
}

/// Classifies lines for the segment builder.
pub struct KumihanLineClassifier;

impl KumihanLineClassifier {
    pub fn classify(&self, line: LineRef) -> LineClass {
        let trimmed = line.content().trim();
        let kind = if trimmed.is_empty() {
            LineKind::Blank
        } else if is_block_close(trimmed) {
            LineKind::BlockClose
        } else if let Some(body) = block_open(trimmed) {
            LineKind::BlockOpen {
                body: body.to_string(),
            }
        } else if trimmed.starts_with(is_marker_char) {
            LineKind::Marked
        } else if let Some((ordered, _)) = list_item(trimmed) {
            LineKind::ListItem { ordered }
        } else {
            LineKind::Text
        };
        LineClass { kind, line }
    }
}

/// Splits a list item line into `(ordered, item text)`.
pub fn list_item(text: &str) -> Option<(bool, &str)> {
    let text = text.trim_start();
    for prefix in ["- ", "* "] {
        if let Some(rest) = text.strip_prefix(prefix) {
            return Some((false, rest.trim_start()));
        }
    }
    if let Some(rest) = text.strip_prefix('・') {
        return Some((false, rest.trim_start()));
    }
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0
        && let Some(rest) = text[digits..].strip_prefix(". ")
    {
        return Some((true, rest.trim_start()));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::rope::Span;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn line(text: &str) -> LineRef {
        LineRef {
            span: Span {
                start: 0,
                end: text.len(),
            },
            number: 1,
            text: text.to_string(),
        }
    }

    #[rstest]
    #[case("\n", LineKind::Blank)]
    #[case("   ", LineKind::Blank)]
    #[case("##\n", LineKind::BlockClose)]
    #[case("＃＃", LineKind::BlockClose)]
    #[case("# 枠線\n", LineKind::BlockOpen { body: "枠線".to_string() })]
    #[case("＃見出し1＃", LineKind::BlockOpen { body: "見出し1".to_string() })]
    #[case("# 太字 #重要##", LineKind::Marked)]
    #[case("# #x##", LineKind::Marked)]
    #[case("- 項目", LineKind::ListItem { ordered: false })]
    #[case("・項目", LineKind::ListItem { ordered: false })]
    #[case("12. 項目", LineKind::ListItem { ordered: true })]
    #[case("本文 # 太字 #x##", LineKind::Text)]
    #[case("**強調**", LineKind::Text)]
    #[case("3.14 は円周率", LineKind::Text)]
    fn classifies(#[case] text: &str, #[case] expected: LineKind) {
        assert_eq!(KumihanLineClassifier.classify(line(text)).kind, expected);
    }

    #[rstest]
    #[case("- a", Some((false, "a")))]
    #[case("* a", Some((false, "a")))]
    #[case("・ a", Some((false, "a")))]
    #[case("1. a", Some((true, "a")))]
    #[case("1.a", None)]
    #[case("-a", None)]
    fn list_items(#[case] text: &str, #[case] expected: Option<(bool, &str)>) {
        assert_eq!(list_item(text), expected);
    }
}
