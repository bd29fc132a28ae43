//! # Marker Scanning
//!
//! Finds `# keyword #content##` spans in a line with an explicit single-pass
//! scanner, in the manner of a cursor-based inline parser.
//!
//! ## Forms
//!
//! - **Inline**: `# kw #content##`, any number per line, surrounded by text
//! - **Block open**: `# kw` or `# kw #` alone on a line; closed later by a
//!   `##` line
//!
//! `#` and `＃` are interchangeable, but one span never mixes them. Body and
//! content both close at the nearest valid delimiter.
//!
//! ## Modules
//!
//! - **`cursor`**: char-aware `Cursor` with absolute position tracking
//! - **`result`**: `ParseResult`, `MarkerSpan`, `Piece`
//! - **`scanner`**: `MarkerScanner`, block-open detection, defect diagnosis

pub mod cursor;
pub mod result;
pub mod scanner;

pub use result::{MarkerForm, MarkerSpan, ParseResult, Piece};
pub use scanner::{
    MARKER_CHARS, MarkerDefect, MarkerScanner, block_open, diagnose, is_block_close,
    is_marker_char,
};
