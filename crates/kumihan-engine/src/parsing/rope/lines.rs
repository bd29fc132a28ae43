use xi_rope::Rope;

use super::span::Span;

/// A reference to a single line in the source with its byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRef {
    /// Byte span of this line in the document (includes newline if present).
    pub span: Span,
    /// 1-based line number in the document.
    pub number: usize,
    /// The line text, newline included.
    pub text: String,
}

impl LineRef {
    /// Line text without the trailing line terminator.
    pub fn content(&self) -> &str {
        self.text.trim_end_matches(['\r', '\n'])
    }

    /// True if the line ends with a newline, i.e. is complete.
    pub fn is_terminated(&self) -> bool {
        self.text.ends_with('\n')
    }
}

/// Returns an iterator over lines with their byte spans, numbered from 1.
///
/// Uses `lines_raw` to preserve newline characters, which is important for
/// accurate span tracking and for line-aligned chunking.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    lines_at(rope, 0, 1)
}

/// Like [`lines_with_spans`], for a rope holding a later part of a document
/// that starts at byte `offset` and line `first_line`.
pub fn lines_at(rope: &Rope, offset: usize, first_line: usize) -> impl Iterator<Item = LineRef> + '_ {
    let mut pos = offset;
    let mut number = first_line;
    rope.lines_raw(..).map(move |line| {
        let start = pos;
        pos += line.len();
        let current = number;
        number += 1;
        LineRef {
            span: Span { start, end: pos },
            number: current,
            text: line.into_owned(),
        }
    })
}
