//! # Segment Building
//!
//! Two-phase grouping of lines into segments, each later handed to one
//! sub-parser.
//!
//! ## Phases
//!
//! 1. **Line Classification** (`classify`): each line is classified on local
//!    facts only (blank, block open/close, list item, marker, text)
//!
//! 2. **Segment Construction** (`builder`): a `SegmentBuilder` groups lines
//!    and emits `Segment`s as they complete
//!
//! ## Key Invariants
//!
//! - Segments are whole lines; a line belongs to exactly one segment, except
//!   blank lines outside blocks, which belong to none
//! - Blocks nest without limit; wrap-as-code blocks are raw zones where only
//!   the terminator is recognized
//! - Line numbers and byte spans are absolute

pub mod builder;
pub mod classify;
pub mod types;

pub use builder::{SegmentBuilder, segments};
pub use classify::{KumihanLineClassifier, LineClass, LineKind, list_item};
pub use types::{Segment, SegmentKind};
