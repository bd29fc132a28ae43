//! # Snapshot Testing Support
//!
//! Utilities for testing the parser via snapshot assertions and invariant
//! checks.
//!
//! ## Modules
//!
//! - **`dump`**: renders a node tree and its errors as stable, indented text
//!   for `insta` snapshot testing
//! - **`invariants`**: runtime checks for parser correctness (node types are
//!   known, no attribute carries a dangerous scheme)
//!
//! ## Testing Strategy
//!
//! Parsing behavior is pinned by fixture snapshots rather than a separate
//! formal grammar. A dump shows node types, attributes, metadata and text, so
//! any change to the tree shows up as a readable diff.

pub mod dump;
pub mod invariants;

pub use dump::dump;
pub use invariants::check as invariants;
