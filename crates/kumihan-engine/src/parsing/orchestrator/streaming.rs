use xi_rope::Rope;

use crate::parsing::blocks::{KumihanLineClassifier, SegmentBuilder};
use crate::parsing::rope::lines_at;
use crate::parsing::subparsers::{ParseContext, Parsed};

use super::sequential::segment_text;

/// Incremental parser for text that arrives in pieces.
///
/// Complete lines are classified as they arrive. Once at least `threshold`
/// bytes are held, everything up to the last safe cut is parsed and dropped
/// from the buffer. A cut is safe after a blank line or a line ending in a
/// `##` terminator, provided no segment is open there. With no safe cut the
/// buffer keeps growing. Line numbers and byte offsets stay absolute.
pub struct StreamingParser<'r> {
    ctx: ParseContext<'r>,
    threshold: usize,
    buffer: String,
    /// Document offset of `buffer[0]`.
    offset: usize,
    /// Line number of the first buffered line.
    next_line: usize,
    /// Tracks segment state over the classified lines.
    builder: SegmentBuilder<'r>,
    /// Bytes and lines of `buffer` already classified.
    scanned: (usize, usize),
    /// Latest safe cut within the classified lines, as bytes and lines.
    last_cut: Option<(usize, usize)>,
}

impl<'r> StreamingParser<'r> {
    pub fn new(ctx: ParseContext<'r>, threshold: usize) -> Self {
        Self {
            builder: SegmentBuilder::new(ctx.registry),
            ctx,
            threshold,
            buffer: String::new(),
            offset: 0,
            next_line: 1,
            scanned: (0, 0),
            last_cut: None,
        }
    }

    /// Bytes waiting to be parsed.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Adds `text` and returns whatever became parseable.
    pub fn push(&mut self, text: &str) -> Parsed {
        self.buffer.push_str(text);
        self.scan_new_lines();
        if self.buffer.len() < self.threshold {
            return Parsed::default();
        }
        let Some((cut, lines)) = self.last_cut.take() else {
            log::trace!(
                "no safe cut in {} buffered bytes, waiting for more",
                self.buffer.len()
            );
            return Parsed::default();
        };
        log::debug!(
            "streaming flush of {cut} bytes at line {}",
            self.next_line
        );
        let parsed = self.parse_prefix(cut);
        self.buffer.drain(..cut);
        self.offset += cut;
        self.next_line += lines;
        self.scanned = (self.scanned.0 - cut, self.scanned.1 - lines);
        parsed
    }

    /// Parses whatever is still buffered.
    pub fn finish(self) -> Parsed {
        self.parse_prefix(self.buffer.len())
    }

    /// Classifies complete lines added since the last call, recording the
    /// latest safe cut.
    fn scan_new_lines(&mut self) {
        let (start, first) = self.scanned;
        let rope = Rope::from(&self.buffer[start..]);
        let classifier = KumihanLineClassifier;
        let lines = lines_at(&rope, self.offset + start, self.next_line + first);
        for line in lines {
            if !line.is_terminated() {
                break;
            }
            let end = line.span.end - self.offset;
            let safe = is_cut_line(line.content());
            self.builder.push(classifier.classify(line));
            self.builder.drain();
            self.scanned = (end, self.scanned.1 + 1);
            if safe && self.builder.is_idle() {
                self.last_cut = Some(self.scanned);
            }
        }
    }

    fn parse_prefix(&self, len: usize) -> Parsed {
        let segments = segment_text(&self.ctx, &self.buffer[..len], self.offset, self.next_line);
        self.ctx.dispatch(&segments)
    }
}

/// Blank, or ending in a `##` terminator (a block close or an inline span).
fn is_cut_line(content: &str) -> bool {
    let trimmed = content.trim_end();
    trimmed.trim_start().is_empty() || trimmed.ends_with("##") || trimmed.ends_with("＃＃")
}
