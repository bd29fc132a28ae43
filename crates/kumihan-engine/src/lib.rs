pub mod messages;
pub mod parsing;
pub mod registry;

pub use messages::{Locale, Message};
pub use parsing::{
    MetaValue, Node, NodeContent, ParseError, ParseOutput, ParseResult, Parser, ParserOptions,
    Strategy, parse, resolve_keywords, scan_marker, suggest_keyword, validate_keywords,
};
pub use registry::{KeywordDefinition, KeywordKind, KeywordRegistry, RegistryError};
