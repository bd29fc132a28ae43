//! # Parsing
//!
//! Kumihan text goes through these stages:
//!
//! 1. **Segmentation** (`blocks`): lines are classified and grouped into
//!    keyword lines, blocks, lists and paragraphs
//! 2. **Scanning** (`marker`): marker spans are found in each line
//! 3. **Resolution** (`keywords`): marker bodies become keywords plus
//!    attributes, checked against the registry
//! 4. **Assembly** (`assemble`, `subparsers`): segments become [`Node`]s
//! 5. **Orchestration** (`orchestrator`): sequential, parallel or streaming
//!
//! Nothing below [`orchestrator`] holds mutable shared state, so any of it
//! can run on any thread.

pub mod assemble;
pub mod blocks;
pub mod error;
pub mod keywords;
pub mod marker;
pub mod node;
pub mod orchestrator;
pub mod rope;
pub mod snapshot;
pub mod subparsers;

#[cfg(test)]
mod tests;

use crate::messages::Locale;
use crate::registry::KeywordRegistry;

pub use error::ParseError;
pub use keywords::{KeywordValidator, Resolution, ValidationReport};
pub use marker::ParseResult;
pub use node::{MetaValue, Node, NodeContent};
pub use orchestrator::{ParseOutput, Parser, ParserOptions, Strategy};

/// Parses `text` with default options.
pub fn parse(registry: &KeywordRegistry, text: &str) -> ParseOutput {
    Parser::new(registry, ParserOptions::default()).parse(text)
}

/// Scans one line for marker spans.
pub fn scan_marker(text: &str) -> Option<ParseResult> {
    marker::MarkerScanner::default().scan(text)
}

/// Splits a marker body into keywords and attributes.
pub fn resolve_keywords(body: &str) -> Resolution {
    keywords::KeywordResolver::default().resolve(body)
}

pub fn validate_keywords<'r, S: AsRef<str>>(
    registry: &'r KeywordRegistry,
    keywords: &[S],
    locale: Locale,
) -> ValidationReport<'r> {
    KeywordValidator::new(registry, locale).validate(keywords)
}

/// Up to `max` registered names close to `keyword`.
pub fn suggest_keyword(
    registry: &KeywordRegistry,
    keyword: &str,
    max: usize,
    locale: Locale,
) -> Vec<String> {
    KeywordValidator::new(registry, locale).suggest(keyword, max)
}
