use super::markdown::render_lines;
use super::{ParseContext, Parsed, SegmentParser};
use crate::parsing::blocks::{Segment, SegmentKind, list_item};
use crate::parsing::error::ParseError;
use crate::parsing::node::Node;

/// Turns a run of list items into `ul`/`ol` with one `li` per line.
/// Item text gets the same inline treatment as a paragraph.
pub struct ListParser;

impl SegmentParser for ListParser {
    fn name(&self) -> &'static str {
        "list"
    }

    fn can_parse(&self, segment: &Segment) -> bool {
        matches!(segment.kind, SegmentKind::List { .. })
    }

    fn parse(&self, segment: &Segment, ctx: &ParseContext<'_>) -> Result<Parsed, ParseError> {
        let SegmentKind::List { ordered } = segment.kind else {
            return Err(ParseError::SubParser {
                parser: self.name(),
                reason: "not a list segment".to_string(),
            });
        };

        let mut out = Parsed::default();
        let mut items = vec![];
        for line in &segment.lines {
            let content = line.content();
            let Some((_, item)) = list_item(content) else {
                return Err(ParseError::SubParser {
                    parser: self.name(),
                    reason: format!("line {} is not a list item", line.number),
                });
            };
            let base = line.span.start + content.len() - item.len();
            let inline = render_lines(ctx, [(item, base, line.number)]);
            out.errors.extend(inline.errors);
            items.push(Node::element("li", inline.nodes));
        }

        let tag = if ordered { "ol" } else { "ul" };
        out.nodes.push(Node::element(tag, items));
        Ok(out)
    }
}
