use crate::parsing::rope::{LineRef, Span};

/// What a group of lines is, as decided by the segment builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// A single line starting with a marker.
    Keyword,
    /// A block from its opening marker line to the matching `##`.
    Block {
        /// Keyword body of the opening marker.
        body: String,
        /// False if input ended before the terminator.
        closed: bool,
        /// Inner lines are a raw zone (a wrap-as-code keyword).
        raw: bool,
    },
    /// Consecutive list items of one kind.
    List { ordered: bool },
    /// Consecutive text lines.
    Paragraph,
    /// A `##` line with no open block.
    StrayClose,
}

/// A run of whole lines handed to one sub-parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Never empty.
    pub lines: Vec<LineRef>,
}

impl Segment {
    /// Byte span from the first line's start to the last line's end.
    pub fn span(&self) -> Span {
        match (self.lines.first(), self.lines.last()) {
            (Some(first), Some(last)) => Span {
                start: first.span.start,
                end: last.span.end,
            },
            _ => Span { start: 0, end: 0 },
        }
    }

    /// 1-based number of the first line.
    pub fn first_line(&self) -> usize {
        self.lines.first().map_or(0, |l| l.number)
    }

    /// For a block, the lines between the opening marker and the terminator.
    /// For anything else, all lines.
    pub fn inner_lines(&self) -> &[LineRef] {
        match &self.kind {
            SegmentKind::Block { closed, .. } => {
                let end = if *closed {
                    self.lines.len().saturating_sub(1)
                } else {
                    self.lines.len()
                };
                self.lines.get(1..end).unwrap_or(&[])
            }
            _ => &self.lines,
        }
    }
}
