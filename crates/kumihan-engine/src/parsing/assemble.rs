use crate::messages::{Locale, Message};
use crate::parsing::keywords::{KeywordValidator, Resolution};
use crate::parsing::marker::{ParseResult, Piece};
use crate::parsing::node::{MetaValue, Node, NodeContent, push_text};
use crate::registry::{KeywordDefinition, KeywordRegistry, UNKNOWN_KEYWORD_NODE};

/// Builds keyword nodes from resolved markers.
#[derive(Debug, Clone, Copy)]
pub struct NodeAssembler<'r> {
    registry: &'r KeywordRegistry,
    locale: Locale,
}

impl<'r> NodeAssembler<'r> {
    pub fn new(registry: &'r KeywordRegistry, locale: Locale) -> Self {
        Self { registry, locale }
    }

    /// The node for one marker wrapped around `content`, plus every
    /// diagnostic the marker produced.
    ///
    /// Valid keywords nest with the first one outermost. Unknown keywords are
    /// dropped; if none are left the result is an `unknown_keyword` node, or
    /// an `error` node when the marker had no usable keyword at all.
    pub fn marked(
        &self,
        resolution: &Resolution,
        content: NodeContent,
        line: usize,
    ) -> (Node, Vec<String>) {
        let report = KeywordValidator::new(self.registry, self.locale).validate(&resolution.keywords);
        let mut errors = resolution.errors.clone();
        errors.extend(report.messages().cloned());

        let Some(((_, outer), inner_defs)) = report.valid.split_first() else {
            let node = match report.unknown.first() {
                Some(unknown) => Node::new(UNKNOWN_KEYWORD_NODE, content)
                    .with_meta("keyword", MetaValue::Text(unknown.keyword.clone()))
                    .with_meta("suggestions", MetaValue::List(unknown.suggestions.clone()))
                    .with_meta("line", MetaValue::Number(line)),
                None => {
                    let message = errors
                        .first()
                        .cloned()
                        .unwrap_or_else(|| Message::EmptyKeyword.render(self.locale));
                    Node::error(message, content, line)
                }
            };
            return (node, errors);
        };

        let mut inner = match resolution.attributes.get("ruby_base") {
            Some(base) => NodeContent::Text(base.clone()),
            None => content,
        };
        for (_, def) in inner_defs.iter().rev() {
            inner = NodeContent::Children(vec![keyword_node(def, inner)]);
        }

        let mut node = keyword_node(outer, inner);
        node.attributes.extend(resolution.attributes.clone());

        let ids = report.valid.iter().map(|(_, d)| d.id.clone()).collect();
        node = node
            .with_meta("keywords", MetaValue::List(ids))
            .with_meta("line", MetaValue::Number(line));
        if !report.warnings.is_empty() {
            node = node.with_meta("warnings", MetaValue::List(report.warnings.clone()));
        }
        let mut css: Vec<String> = vec![];
        for class in report.valid.iter().flat_map(|(_, d)| &d.css_requirements) {
            if !css.contains(class) {
                css.push(class.clone());
            }
        }
        if !css.is_empty() {
            node = node.with_meta("css_requirements", MetaValue::List(css));
        }
        (node, errors)
    }

    /// Nodes for the pieces of a scanned line, in order.
    pub fn line(&self, result: &ParseResult, line: usize) -> (Vec<Node>, Vec<String>) {
        let mut nodes = vec![];
        let mut errors = vec![];
        for piece in &result.pieces {
            match piece {
                Piece::Text(text) => push_text(&mut nodes, text),
                Piece::Marked {
                    content,
                    resolution,
                    ..
                } => {
                    let (node, errs) =
                        self.marked(resolution, NodeContent::Text(content.clone()), line);
                    nodes.push(node);
                    errors.extend(errs);
                }
            }
        }
        (nodes, errors)
    }
}

fn keyword_node(def: &KeywordDefinition, content: NodeContent) -> Node {
    let mut node = Node::new(def.output_tag.clone(), content);
    node.attributes = def.attributes.clone();
    node
}
