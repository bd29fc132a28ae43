use super::{ParseContext, Parsed, SegmentParser};
use crate::messages::Message;
use crate::parsing::blocks::{Segment, SegmentKind};
use crate::parsing::error::ParseError;
use crate::parsing::keywords::KeywordResolver;
use crate::parsing::node::{Node, NodeContent};
use crate::parsing::rope::LineRef;

/// Parses `# kw` .. `##` blocks, and `##` lines that close nothing.
///
/// Inner lines are parsed recursively as a document of their own, except in
/// a raw zone, where they are kept verbatim as the block's text.
pub struct BlockParser;

impl SegmentParser for BlockParser {
    fn name(&self) -> &'static str {
        "block"
    }

    fn can_parse(&self, segment: &Segment) -> bool {
        matches!(
            segment.kind,
            SegmentKind::Block { .. } | SegmentKind::StrayClose
        )
    }

    fn parse(&self, segment: &Segment, ctx: &ParseContext<'_>) -> Result<Parsed, ParseError> {
        match &segment.kind {
            SegmentKind::StrayClose => Ok(stray_close(segment, ctx)),
            SegmentKind::Block { body, closed, raw } => {
                Ok(block(segment, ctx, body, *closed, *raw))
            }
            _ => Err(ParseError::SubParser {
                parser: self.name(),
                reason: "not a block segment".to_string(),
            }),
        }
    }
}

fn stray_close(segment: &Segment, ctx: &ParseContext<'_>) -> Parsed {
    let line = segment.first_line();
    let message = Message::StrayBlockClose { line }.render(ctx.locale);
    let text = segment
        .lines
        .first()
        .map(|l| l.content().trim().to_string())
        .unwrap_or_default();
    Parsed {
        nodes: vec![Node::error(message.clone(), NodeContent::Text(text), line)],
        errors: vec![message],
    }
}

fn block(segment: &Segment, ctx: &ParseContext<'_>, body: &str, closed: bool, raw: bool) -> Parsed {
    let line = segment.first_line();
    let inner = segment.inner_lines();
    let resolution = KeywordResolver::new(ctx.locale).resolve(body);

    let mut inner_errors = vec![];
    let content = if raw {
        let text: Vec<&str> = inner.iter().map(LineRef::content).collect();
        NodeContent::Text(text.join("\n"))
    } else {
        let parsed = ctx.parse_lines(inner);
        inner_errors = parsed.errors;
        NodeContent::Children(parsed.nodes)
    };

    let (mut node, mut errors) = ctx.assembler().marked(&resolution, content, line);
    errors.extend(inner_errors);

    if !closed {
        let message = Message::UnclosedBlock {
            line,
            keyword: body,
        }
        .render(ctx.locale);
        log::warn!("{message}");
        errors.push(message.clone());
        node = Node::error(message, NodeContent::Children(vec![node]), line);
    }

    Parsed {
        nodes: vec![node],
        errors,
    }
}
