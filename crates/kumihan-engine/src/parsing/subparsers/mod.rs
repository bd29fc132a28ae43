//! # Sub-parsers
//!
//! Each segment is handed to the first [`SegmentParser`] that accepts it, in
//! a fixed priority order: keyword, list, block, markdown. A parser that
//! returns `Err` is logged and the next one is tried. The markdown parser
//! accepts anything, so every segment produces output.
//!
//! ## Modules
//!
//! - **`keyword`**: lines starting with a marker
//! - **`list`**: `ul`/`ol` from list item runs
//! - **`block`**: `# kw` .. `##` blocks and stray terminators
//! - **`markdown`**: paragraphs with inline markdown and inline markers

pub mod block;
pub mod keyword;
pub mod list;
pub mod markdown;

use crate::messages::Locale;
use crate::parsing::assemble::NodeAssembler;
use crate::parsing::blocks::{Segment, segments};
use crate::parsing::error::ParseError;
use crate::parsing::marker::MarkerScanner;
use crate::parsing::node::Node;
use crate::parsing::rope::LineRef;
use crate::registry::KeywordRegistry;

pub use block::BlockParser;
pub use keyword::KeywordLineParser;
pub use list::ListParser;
pub use markdown::MarkdownParser;

/// Nodes and diagnostics produced for some part of the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    pub nodes: Vec<Node>,
    pub errors: Vec<String>,
}

impl Parsed {
    pub fn extend(&mut self, other: Parsed) {
        self.nodes.extend(other.nodes);
        self.errors.extend(other.errors);
    }
}

/// A parser for one kind of segment.
pub trait SegmentParser: Sync {
    fn name(&self) -> &'static str;

    fn can_parse(&self, segment: &Segment) -> bool;

    fn parse(&self, segment: &Segment, ctx: &ParseContext<'_>) -> Result<Parsed, ParseError>;
}

static SUB_PARSERS: [&dyn SegmentParser; 4] = [
    &KeywordLineParser,
    &ListParser,
    &BlockParser,
    &MarkdownParser,
];

/// Read-only state shared by every sub-parser during one parse.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'r> {
    pub registry: &'r KeywordRegistry,
    pub locale: Locale,
}

impl<'r> ParseContext<'r> {
    pub fn new(registry: &'r KeywordRegistry, locale: Locale) -> Self {
        Self { registry, locale }
    }

    pub fn scanner(&self) -> MarkerScanner {
        MarkerScanner::new(self.locale)
    }

    pub fn assembler(&self) -> NodeAssembler<'r> {
        NodeAssembler::new(self.registry, self.locale)
    }

    /// Parses segments in order.
    pub fn dispatch(&self, segments: &[Segment]) -> Parsed {
        let mut out = Parsed::default();
        for segment in segments {
            out.extend(self.dispatch_one(segment));
        }
        out
    }

    /// Groups `lines` into segments and parses them.
    pub fn parse_lines(&self, lines: &[LineRef]) -> Parsed {
        self.dispatch(&segments(self.registry, lines.iter().cloned()))
    }

    fn dispatch_one(&self, segment: &Segment) -> Parsed {
        for parser in SUB_PARSERS.iter() {
            if !parser.can_parse(segment) {
                continue;
            }
            log::trace!(
                "{} parser takes segment at line {} ({:?})",
                parser.name(),
                segment.first_line(),
                segment.span()
            );
            match parser.parse(segment, self) {
                Ok(parsed) => return parsed,
                Err(e) => log::debug!("line {}: {e}", segment.first_line()),
            }
        }
        log::warn!("no parser accepted segment at line {}", segment.first_line());
        let text: Vec<&str> = segment.lines.iter().map(LineRef::content).collect();
        Parsed {
            nodes: vec![Node::text(text.join("\n"))],
            errors: vec![],
        }
    }
}
