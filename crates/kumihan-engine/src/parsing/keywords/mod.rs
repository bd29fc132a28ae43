//! # Keywords
//!
//! Everything between a marker's opening character and its content.
//!
//! ## Modules
//!
//! - **`attributes`**: `color=`, `size:`, `style:` extraction and sanitization
//! - **`ruby`**: `base(reading)` notation
//! - **`resolver`**: splits a marker body into primitive keywords and attributes
//! - **`similarity`**: string similarity for suggestions
//! - **`validator`**: registry checks, suggestions, combination warnings
//!
//! Resolution is purely syntactic; only the validator consults the registry.

pub mod attributes;
pub mod resolver;
pub mod ruby;
pub mod similarity;
pub mod validator;

pub use attributes::{extract_color, extract_size, extract_style, sanitize_color};
pub use resolver::{KeywordResolver, Resolution};
pub use ruby::{Ruby, parse_ruby};
pub use validator::{KeywordValidator, UnknownKeyword, ValidationReport};
