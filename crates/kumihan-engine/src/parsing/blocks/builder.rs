use crate::parsing::keywords::KeywordResolver;
use crate::parsing::rope::LineRef;
use crate::registry::KeywordRegistry;

use super::{
    classify::{KumihanLineClassifier, LineClass, LineKind},
    types::{Segment, SegmentKind},
};

#[derive(Debug)]
enum State {
    Idle,
    Paragraph(Vec<LineRef>),
    List {
        ordered: bool,
        lines: Vec<LineRef>,
    },
    Block {
        body: String,
        raw: bool,
        /// Raw flag of every block opened and not yet closed, outermost first.
        open: Vec<bool>,
        lines: Vec<LineRef>,
    },
}

/// Line-at-a-time state machine grouping classified lines into segments.
pub struct SegmentBuilder<'r> {
    registry: &'r KeywordRegistry,
    state: State,
    out: Vec<Segment>,
}

impl<'r> SegmentBuilder<'r> {
    pub fn new(registry: &'r KeywordRegistry) -> Self {
        Self {
            registry,
            state: State::Idle,
            out: vec![],
        }
    }

    pub fn push(&mut self, c: LineClass) {
        if matches!(self.state, State::Block { .. }) {
            self.consume_block_line(c);
            return;
        }

        match c.kind {
            LineKind::Blank => self.flush(),
            LineKind::BlockClose => {
                self.flush();
                self.emit(SegmentKind::StrayClose, vec![c.line]);
            }
            LineKind::BlockOpen { body } => {
                self.flush();
                let raw = self.is_raw(&body);
                self.state = State::Block {
                    body,
                    raw,
                    open: vec![raw],
                    lines: vec![c.line],
                };
            }
            LineKind::Marked => {
                self.flush();
                self.emit(SegmentKind::Keyword, vec![c.line]);
            }
            LineKind::ListItem { ordered } => {
                if let State::List {
                    ordered: current,
                    lines,
                } = &mut self.state
                    && *current == ordered
                {
                    lines.push(c.line);
                    return;
                }
                self.flush();
                self.state = State::List {
                    ordered,
                    lines: vec![c.line],
                };
            }
            LineKind::Text => {
                if let State::Paragraph(lines) = &mut self.state {
                    lines.push(c.line);
                    return;
                }
                self.flush();
                self.state = State::Paragraph(vec![c.line]);
            }
        }
    }

    /// True when no segment is in progress: the next line starts afresh.
    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    /// Takes the segments completed so far.
    pub fn drain(&mut self) -> Vec<Segment> {
        std::mem::take(&mut self.out)
    }

    pub fn finish(mut self) -> Vec<Segment> {
        // EOF flush
        self.flush();
        if let State::Block {
            body, raw, lines, ..
        } = std::mem::replace(&mut self.state, State::Idle)
        {
            log::warn!("block '{body}' opened on line {} is not closed", first_number(&lines));
            self.emit(
                SegmentKind::Block {
                    body,
                    closed: false,
                    raw,
                },
                lines,
            );
        }
        self.out
    }

    fn consume_block_line(&mut self, c: LineClass) {
        let nested_raw = match &c.kind {
            LineKind::BlockOpen { body } => Some(self.is_raw(body)),
            _ => None,
        };
        let State::Block { open, lines, .. } = &mut self.state else {
            return;
        };
        let in_raw = open.last().copied().unwrap_or(false);
        match (&c.kind, nested_raw) {
            (LineKind::BlockClose, _) => {
                open.pop();
            }
            (_, Some(raw)) if !in_raw => open.push(raw),
            _ => {}
        }
        lines.push(c.line);

        if open.is_empty()
            && let State::Block {
                body, raw, lines, ..
            } = std::mem::replace(&mut self.state, State::Idle)
        {
            self.emit(
                SegmentKind::Block {
                    body,
                    closed: true,
                    raw,
                },
                lines,
            );
        }
    }

    fn flush(&mut self) {
        let prev = std::mem::replace(&mut self.state, State::Idle);
        match prev {
            State::Idle => {}
            State::Paragraph(lines) => self.emit(SegmentKind::Paragraph, lines),
            State::List { ordered, lines } => self.emit(SegmentKind::List { ordered }, lines),
            block @ State::Block { .. } => self.state = block, // only finish() ends a block
        }
    }

    fn emit(&mut self, kind: SegmentKind, lines: Vec<LineRef>) {
        log::trace!("segment {kind:?} at line {}", first_number(&lines));
        self.out.push(Segment { kind, lines });
    }

    fn is_raw(&self, body: &str) -> bool {
        let resolution = KeywordResolver::default().resolve(body);
        self.registry.is_raw_zone(&resolution.keywords)
    }
}

fn first_number(lines: &[LineRef]) -> usize {
    lines.first().map_or(0, |l| l.number)
}

/// Groups `lines` into segments.
pub fn segments(
    registry: &KeywordRegistry,
    lines: impl IntoIterator<Item = LineRef>,
) -> Vec<Segment> {
    let classifier = KumihanLineClassifier;
    let mut builder = SegmentBuilder::new(registry);
    for line in lines {
        builder.push(classifier.classify(line));
    }
    builder.finish()
}
