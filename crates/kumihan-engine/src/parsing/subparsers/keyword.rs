use super::{ParseContext, Parsed, SegmentParser};
use crate::parsing::blocks::{Segment, SegmentKind};
use crate::parsing::error::ParseError;
use crate::parsing::marker::{MarkerForm, diagnose};
use crate::parsing::node::{MetaValue, Node, NodeContent};

/// Parses a line that starts with a marker.
///
/// A line holding exactly one span becomes that span's node; a span with text
/// around it becomes a paragraph. A line that fails to scan becomes an
/// `error` node naming the defect.
pub struct KeywordLineParser;

impl SegmentParser for KeywordLineParser {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn can_parse(&self, segment: &Segment) -> bool {
        segment.kind == SegmentKind::Keyword
    }

    fn parse(&self, segment: &Segment, ctx: &ParseContext<'_>) -> Result<Parsed, ParseError> {
        let line = segment.lines.first().ok_or(ParseError::SubParser {
            parser: self.name(),
            reason: "empty segment".to_string(),
        })?;
        let text = line.content();

        if let Some(result) = ctx.scanner().scan_at(text, line.span.start)
            && result.form == MarkerForm::Inline
        {
            let (nodes, errors) = ctx.assembler().line(&result, line.number);
            return Ok(Parsed {
                nodes: vec![single_or_paragraph(nodes)],
                errors,
            });
        }

        let Some(defect) = diagnose(text, line.span.start) else {
            return Err(ParseError::SubParser {
                parser: self.name(),
                reason: "no marker span".to_string(),
            });
        };
        let message = defect.message(line.number, ctx.locale);
        let node = Node::error(
            message.clone(),
            NodeContent::Text(text.trim().to_string()),
            line.number,
        )
        .with_meta("offset", MetaValue::Number(defect.offset()));
        Ok(Parsed {
            nodes: vec![node],
            errors: vec![message],
        })
    }
}

fn single_or_paragraph(mut nodes: Vec<Node>) -> Node {
    if nodes.len() == 1
        && nodes[0].node_type != "text"
        && let Some(node) = nodes.pop()
    {
        return node;
    }
    Node::element("p", nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Locale;
    use crate::parsing::blocks::segments;
    use crate::parsing::rope::lines_with_spans;
    use crate::registry::KeywordRegistry;
    use pretty_assertions::assert_eq;
    use xi_rope::Rope;

    fn parse(text: &str) -> Parsed {
        let registry = KeywordRegistry::with_defaults();
        let ctx = ParseContext::new(&registry, Locale::En);
        let rope = Rope::from(text);
        let segs = segments(&registry, lines_with_spans(&rope));
        let seg = segs
            .iter()
            .find(|s| KeywordLineParser.can_parse(s))
            .expect("a keyword segment");
        KeywordLineParser.parse(seg, &ctx).unwrap()
    }

    #[test]
    fn single_span_is_bare_node() {
        let parsed = parse("# 太字 #重要##");
        assert_eq!(parsed.nodes.len(), 1);
        assert_eq!(parsed.nodes[0].node_type, "strong");
        assert_eq!(parsed.nodes[0].content.as_text(), Some("重要"));
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn span_with_trailing_text_is_paragraph() {
        let parsed = parse("# 太字 #重要## です");
        let p = &parsed.nodes[0];
        assert_eq!(p.node_type, "p");
        let types: Vec<_> = p.content.children().iter().map(|n| n.node_type.as_str()).collect();
        assert_eq!(types, vec!["strong", "text"]);
    }

    #[test]
    fn empty_keyword_segment_is_error_node() {
        let parsed = parse("x\n\n  # #本文##");
        let node = &parsed.nodes[0];
        assert!(node.is_error());
        assert_eq!(node.metadata["line"], MetaValue::Number(3));
        assert_eq!(node.metadata["offset"], MetaValue::Number(5));
        assert_eq!(
            parsed.errors,
            vec!["line 3, byte 5: marker has an empty keyword"]
        );
    }

    #[test]
    fn unterminated_marker_is_error_node() {
        let parsed = parse("# 太字 #重要");
        assert!(parsed.nodes[0].is_error());
        assert_eq!(parsed.errors, vec!["line 1, byte 0: marker is not closed"]);
    }
}
