use std::collections::BTreeMap;

use crate::parsing::keywords::Resolution;

/// How a scanned line uses its markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerForm {
    /// `# kw #content##`: keyword and content on one line.
    Inline,
    /// `# kw` or `# kw #` alone on a line, opening a block closed by `##`.
    Block,
}

/// A delimited region of the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSpan {
    /// Absolute byte offset of the opening marker.
    pub offset: usize,
    /// Length in bytes, closing `##` included.
    pub length: usize,
    pub text: String,
}

impl MarkerSpan {
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// A run of the scanned line: plain text or one marker span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Text(String),
    Marked {
        /// Index into [`ParseResult::markers`].
        marker: usize,
        body: String,
        content: String,
        resolution: Resolution,
    },
}

/// Everything the scanner found in one piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub form: MarkerForm,
    /// Spans in text order. They never overlap.
    pub markers: Vec<MarkerSpan>,
    /// Text with the markers removed, trimmed.
    pub content: String,
    /// Keyword texts from all spans in order, duplicates kept.
    pub keywords: Vec<String>,
    /// Attributes from all spans, last write wins.
    pub attributes: BTreeMap<String, String>,
    pub errors: Vec<String>,
    /// The text split into plain runs and marked spans. Empty for
    /// [`MarkerForm::Block`].
    pub pieces: Vec<Piece>,
}

impl ParseResult {
    /// Keywords, attributes and errors of the whole result.
    pub fn resolution(&self) -> Resolution {
        Resolution {
            keywords: self.keywords.clone(),
            attributes: self.attributes.clone(),
            errors: self.errors.clone(),
        }
    }
}
