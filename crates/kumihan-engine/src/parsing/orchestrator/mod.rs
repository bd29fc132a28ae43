//! # Parse Orchestration
//!
//! [`Parser`] picks a strategy for an input and runs the sub-parsers over it.
//!
//! ## Strategies
//!
//! - **Sequential**: segment the whole input and dispatch on this thread
//! - **Parallel**: segment, cut the segments into chunks, dispatch chunks on
//!   a scoped worker pool, concatenate in chunk order
//! - **Streaming**: feed pieces to a [`StreamingParser`], which flushes at
//!   block boundaries
//!
//! All three produce the same nodes and errors for the same text.
//!
//! ## Phases
//!
//! `Idle → Scanning → {Sequential | Parallel | Streaming} → Done`

pub mod options;
pub mod parallel;
pub mod sequential;
pub mod streaming;

use serde::Serialize;

use crate::parsing::error::ParseError;
use crate::parsing::node::Node;
use crate::parsing::subparsers::{ParseContext, Parsed};
use crate::registry::KeywordRegistry;

pub use options::{ParserOptions, Strategy, UnknownStrategy};
pub use parallel::{chunk_segments, parse_parallel, run_chunks, worker_count};
pub use sequential::parse_sequential;
pub use streaming::StreamingParser;

/// Where a parse run is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Scanning,
    Sequential,
    Parallel,
    Streaming,
    Done,
}

impl Phase {
    pub fn can_advance_to(self, next: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, next),
            (Idle, Scanning)
                | (Scanning, Sequential | Parallel | Streaming)
                | (Sequential | Parallel | Streaming, Done)
        )
    }

    fn of(strategy: Strategy) -> Phase {
        match strategy {
            Strategy::Sequential => Phase::Sequential,
            Strategy::Parallel => Phase::Parallel,
            Strategy::Streaming => Phase::Streaming,
        }
    }
}

struct PhaseTracker(Phase);

impl PhaseTracker {
    fn advance(&mut self, next: Phase) {
        debug_assert!(self.0.can_advance_to(next), "{:?} -> {next:?}", self.0);
        log::debug!("parse phase {:?} -> {next:?}", self.0);
        self.0 = next;
    }
}

/// Everything one parse produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseOutput {
    pub nodes: Vec<Node>,
    /// Diagnostics in document order.
    pub errors: Vec<String>,
    #[serde(skip)]
    pub strategy: Strategy,
}

impl ParseOutput {
    fn new(parsed: Parsed, strategy: Strategy) -> Self {
        Self {
            nodes: parsed.nodes,
            errors: parsed.errors,
            strategy,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Entry point for parsing Kumihan text against a keyword registry.
#[derive(Debug, Clone)]
pub struct Parser<'r> {
    registry: &'r KeywordRegistry,
    options: ParserOptions,
}

impl<'r> Parser<'r> {
    pub fn new(registry: &'r KeywordRegistry, options: ParserOptions) -> Self {
        Self { registry, options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn context(&self) -> ParseContext<'r> {
        ParseContext::new(self.registry, self.options.locale)
    }

    /// Parallel for large inputs, sequential otherwise.
    pub fn select_strategy(&self, text: &str) -> Strategy {
        let lines = text.bytes().filter(|&b| b == b'\n').count() + 1;
        if lines >= self.options.parallel_line_threshold
            || text.len() >= self.options.parallel_byte_threshold
        {
            Strategy::Parallel
        } else {
            Strategy::Sequential
        }
    }

    pub fn parse(&self, text: &str) -> ParseOutput {
        let strategy = self.select_strategy(text);
        self.parse_with(text, strategy)
    }

    /// Parses with a fixed strategy. The output does not depend on it.
    pub fn parse_with(&self, text: &str, strategy: Strategy) -> ParseOutput {
        let mut phase = PhaseTracker(Phase::Idle);
        phase.advance(Phase::Scanning);
        log::debug!("{strategy} parse of {} bytes", text.len());
        phase.advance(Phase::of(strategy));

        let ctx = self.context();
        let parsed = match strategy {
            Strategy::Sequential => parse_sequential(&ctx, text),
            Strategy::Parallel => parse_parallel(
                &ctx,
                text,
                self.options.chunk_lines,
                self.options.max_workers,
            ),
            Strategy::Streaming => {
                let mut stream = self.streaming();
                let mut out = Parsed::default();
                for piece in text.split_inclusive('\n') {
                    out.extend(stream.push(piece));
                }
                out.extend(stream.finish());
                out
            }
        };

        phase.advance(Phase::Done);
        ParseOutput::new(parsed, strategy)
    }

    /// Parses raw bytes, which must be UTF-8.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<ParseOutput, ParseError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(self.parse(text))
    }

    /// Parses text that arrives in pieces.
    pub fn parse_stream<I, S>(&self, pieces: I) -> ParseOutput
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut phase = PhaseTracker(Phase::Idle);
        phase.advance(Phase::Scanning);
        phase.advance(Phase::Streaming);

        let mut stream = self.streaming();
        let mut out = Parsed::default();
        for piece in pieces {
            out.extend(stream.push(piece.as_ref()));
        }
        out.extend(stream.finish());

        phase.advance(Phase::Done);
        ParseOutput::new(out, Strategy::Streaming)
    }

    pub fn streaming(&self) -> StreamingParser<'r> {
        StreamingParser::new(self.context(), self.options.stream_buffer_bytes)
    }
}
