use xi_rope::Rope;

use crate::parsing::blocks::{Segment, segments};
use crate::parsing::rope::lines_at;
use crate::parsing::subparsers::{ParseContext, Parsed};

/// Segments for `text`, which starts at byte `offset` and line `first_line`
/// of the document.
pub fn segment_text(
    ctx: &ParseContext<'_>,
    text: &str,
    offset: usize,
    first_line: usize,
) -> Vec<Segment> {
    let rope = Rope::from(text);
    segments(ctx.registry, lines_at(&rope, offset, first_line))
}

/// Parses the whole of `text` on the calling thread.
pub fn parse_sequential(ctx: &ParseContext<'_>, text: &str) -> Parsed {
    ctx.dispatch(&segment_text(ctx, text, 0, 1))
}
