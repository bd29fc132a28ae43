use std::collections::BTreeMap;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use super::{ParseContext, Parsed, SegmentParser};
use crate::parsing::blocks::Segment;
use crate::parsing::error::ParseError;
use crate::parsing::keywords::attributes::is_dangerous_scheme;
use crate::parsing::marker::{MarkerForm, Piece};
use crate::parsing::node::{Node, NodeContent, push_text};

/// Stands in for a marker span while pulldown-cmark sees the text.
const PLACEHOLDER: char = '\u{FFFC}';

/// Link target used instead of a dangerous one.
const SAFE_HREF: &str = "#";

/// Renders paragraphs: inline markers first, then inline markdown
/// (`**strong**`, `*em*`, `~~del~~`, `` `code` ``, `[text](href)`).
///
/// Accepts every segment, so it is the last resort of the dispatch chain.
pub struct MarkdownParser;

impl SegmentParser for MarkdownParser {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn can_parse(&self, _segment: &Segment) -> bool {
        true
    }

    fn parse(&self, segment: &Segment, ctx: &ParseContext<'_>) -> Result<Parsed, ParseError> {
        let lines = segment
            .lines
            .iter()
            .map(|l| (l.content(), l.span.start, l.number));
        let inline = render_lines(ctx, lines);
        Ok(Parsed {
            nodes: vec![Node::element("p", inline.nodes)],
            errors: inline.errors,
        })
    }
}

/// A marker node waiting for its placeholder.
struct Replacement {
    node: Node,
    /// Source text of the span, used where markup is not parsed.
    raw: String,
    errors: Vec<String>,
}

/// Inline nodes for `(text, byte offset, line number)` lines, joined by
/// newlines.
pub(crate) fn render_lines<'a>(
    ctx: &ParseContext<'_>,
    lines: impl IntoIterator<Item = (&'a str, usize, usize)>,
) -> Parsed {
    let scanner = ctx.scanner();
    let assembler = ctx.assembler();
    let mut source = String::new();
    let mut replacements = vec![];

    for (i, (text, base, number)) in lines.into_iter().enumerate() {
        if i > 0 {
            source.push('\n');
        }
        match scanner.scan_at(text, base) {
            Some(result) if result.form == MarkerForm::Inline => {
                for piece in &result.pieces {
                    match piece {
                        Piece::Text(t) => push_source(&mut source, t),
                        Piece::Marked {
                            marker,
                            content,
                            resolution,
                            ..
                        } => {
                            let (node, errors) = assembler.marked(
                                resolution,
                                NodeContent::Text(content.clone()),
                                number,
                            );
                            source.push(PLACEHOLDER);
                            replacements.push(Replacement {
                                node,
                                raw: result.markers[*marker].text.clone(),
                                errors,
                            });
                        }
                    }
                }
            }
            _ => {
                let text = text.trim_start();
                // A bare marker line must not become a markdown heading.
                if text.starts_with('#') {
                    source.push('\\');
                }
                push_source(&mut source, text);
            }
        }
    }

    InlineRenderer::new(replacements).render(&source)
}

fn push_source(source: &mut String, text: &str) {
    for c in text.chars() {
        source.push(if c == PLACEHOLDER { '\u{FFFD}' } else { c });
    }
}

/// An inline element being built.
struct Frame {
    tag: &'static str,
    attributes: BTreeMap<String, String>,
    children: Vec<Node>,
}

impl Frame {
    fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: BTreeMap::new(),
            children: vec![],
        }
    }

    fn into_node(self) -> Node {
        let mut node = Node::element(self.tag, self.children);
        node.attributes = self.attributes;
        node
    }
}

/// Maps pulldown-cmark events to nodes, putting marker nodes back in place.
struct InlineRenderer {
    pending: std::vec::IntoIter<Replacement>,
    stack: Vec<Frame>,
    errors: Vec<String>,
    block_ended: bool,
}

impl InlineRenderer {
    fn new(replacements: Vec<Replacement>) -> Self {
        Self {
            pending: replacements.into_iter(),
            stack: vec![Frame::new("p")],
            errors: vec![],
            block_ended: false,
        }
    }

    fn render(mut self, source: &str) -> Parsed {
        for event in Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH) {
            match event {
                Event::Start(tag) => self.start(tag),
                Event::End(end) => self.end(end),
                Event::Text(text) => {
                    self.separate_blocks();
                    self.text(&text);
                }
                Event::Code(code) => {
                    self.separate_blocks();
                    let code = self.restore(&code);
                    self.top().push(Node::new("code", NodeContent::Text(code)));
                }
                Event::Html(html) | Event::InlineHtml(html) => {
                    self.separate_blocks();
                    let html = self.restore(&html);
                    push_text(self.top(), &html);
                }
                Event::SoftBreak | Event::HardBreak => push_text(self.top(), "\n"),
                _ => {}
            }
        }
        while self.stack.len() > 1 {
            self.close();
        }
        let nodes = self.stack.pop().map(|f| f.children).unwrap_or_default();
        Parsed {
            nodes,
            errors: self.errors,
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Strong => Frame::new("strong"),
            Tag::Emphasis => Frame::new("em"),
            Tag::Strikethrough => Frame::new("del"),
            Tag::Link { dest_url, .. } => {
                let href = self.restore(&dest_url);
                let mut frame = Frame::new("a");
                let href = if is_dangerous_scheme(&href) {
                    SAFE_HREF.to_string()
                } else {
                    href
                };
                frame.attributes.insert("href".to_string(), href);
                frame
            }
            _ => return,
        };
        self.separate_blocks();
        self.stack.push(frame);
    }

    fn end(&mut self, end: TagEnd) {
        match end {
            TagEnd::Strong | TagEnd::Emphasis | TagEnd::Strikethrough | TagEnd::Link => {
                self.close()
            }
            TagEnd::Image => {}
            _ => self.block_ended = true,
        }
    }

    fn close(&mut self) {
        if self.stack.len() > 1
            && let Some(frame) = self.stack.pop()
        {
            let node = frame.into_node();
            self.top().push(node);
        }
    }

    fn top(&mut self) -> &mut Vec<Node> {
        let last = self.stack.len() - 1;
        &mut self.stack[last].children
    }

    /// Puts a newline between the content of two markdown blocks.
    fn separate_blocks(&mut self) {
        if std::mem::take(&mut self.block_ended) && !self.top().is_empty() {
            push_text(self.top(), "\n");
        }
    }

    fn text(&mut self, text: &str) {
        for (i, part) in text.split(PLACEHOLDER).enumerate() {
            if i > 0
                && let Some(rep) = self.pending.next()
            {
                self.errors.extend(rep.errors);
                self.top().push(rep.node);
            }
            push_text(self.top(), part);
        }
    }

    /// Replaces placeholders with the span source, for raw contexts.
    fn restore(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for (i, part) in text.split(PLACEHOLDER).enumerate() {
            if i > 0
                && let Some(rep) = self.pending.next()
            {
                out.push_str(&rep.raw);
            }
            out.push_str(part);
        }
        out
    }
}
