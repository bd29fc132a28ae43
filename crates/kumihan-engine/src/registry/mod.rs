//! # Keyword Registry
//!
//! The registry is an explicit, immutable value built once at startup and
//! passed by reference into every parser component. There is no global
//! instance: tests and embedders construct their own.
//!
//! ## Modules
//!
//! - **`defaults`**: the built-in keyword table
//!
//! ## Lookup
//!
//! Keywords are found by their language-independent `id` or by any localized
//! display name. ASCII names match case-insensitively.

mod defaults;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::messages::Locale;

/// Broad category of a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordKind {
    /// Inline text decoration (bold, underline, ...).
    Decoration,
    /// Visual container (box, center, ...).
    Layout,
    /// Document structure (headings, collapsible sections, ...).
    Structure,
    /// Generated or annotated content (ruby, table of contents, ...).
    Content,
}

/// Flags that change how a keyword's content is handled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialOptions {
    /// Content is a raw zone: no nested marker or markdown parsing.
    pub wrap_as_code: bool,
}

/// A registered keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordDefinition {
    pub id: String,
    #[serde(default)]
    pub display_names: BTreeMap<String, String>,
    /// Semantic output tag, e.g. `strong`.
    #[serde(rename = "tag")]
    pub output_tag: String,
    pub kind: KeywordKind,
    /// Static attributes applied to every node of this keyword.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub special_options: SpecialOptions,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub css_requirements: Vec<String>,
}

impl KeywordDefinition {
    /// Display name for `locale`, falling back to Japanese, then the id.
    pub fn display_name(&self, locale: Locale) -> &str {
        self.display_names
            .get(locale.code())
            .or_else(|| self.display_names.get(Locale::Ja.code()))
            .map(String::as_str)
            .unwrap_or(&self.id)
    }

    /// All names this keyword answers to: the id followed by display names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.id.as_str()).chain(self.display_names.values().map(String::as_str))
    }

    pub fn is_heading(&self) -> bool {
        let tag = self.output_tag.as_bytes();
        tag.len() == 2 && tag[0] == b'h' && (b'1'..=b'6').contains(&tag[1])
    }

    pub fn is_collapsible(&self) -> bool {
        self.output_tag == "details"
    }

    pub fn is_code(&self) -> bool {
        self.special_options.wrap_as_code
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("keyword id must not be empty")]
    EmptyId,
    #[error("keyword '{id}' has invalid output tag '{tag}'")]
    InvalidTag { id: String, tag: String },
    #[error("keyword name '{name}' is already used by '{existing}'")]
    NameConflict { name: String, existing: String },
}

/// Node types produced by the structural sub-parsers rather than keywords.
pub const STRUCTURAL_TAGS: &[&str] = &["p", "text", "ul", "ol", "li", "a"];

/// Sentinel node type for syntax errors.
pub const ERROR_NODE: &str = "error";

/// Sentinel node type for markers whose keywords are all unknown.
pub const UNKNOWN_KEYWORD_NODE: &str = "unknown_keyword";

/// Immutable set of keyword definitions indexed by every name.
#[derive(Debug, Clone, Default)]
pub struct KeywordRegistry {
    definitions: Vec<KeywordDefinition>,
    by_name: HashMap<String, usize>,
}

impl KeywordRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in keyword table.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for def in defaults::builtin_keywords() {
            // The built-in table is conflict-free; a failure here is a bug in it.
            if let Err(e) = registry.register(def) {
                log::error!("built-in keyword rejected: {e}");
            }
        }
        registry
    }

    /// Adds a keyword. Fails if the definition is malformed or any of its
    /// names is already taken.
    pub fn register(&mut self, def: KeywordDefinition) -> Result<(), RegistryError> {
        if def.id.trim().is_empty() {
            return Err(RegistryError::EmptyId);
        }
        if !is_element_name(&def.output_tag) {
            return Err(RegistryError::InvalidTag {
                id: def.id.clone(),
                tag: def.output_tag.clone(),
            });
        }

        let mut keys: Vec<String> = def.names().map(normalize_name).collect();
        keys.sort();
        keys.dedup();
        for key in &keys {
            if let Some(&existing) = self.by_name.get(key) {
                return Err(RegistryError::NameConflict {
                    name: key.clone(),
                    existing: self.definitions[existing].id.clone(),
                });
            }
        }

        let index = self.definitions.len();
        for key in keys {
            self.by_name.insert(key, index);
        }
        log::trace!("registered keyword {} -> <{}>", def.id, def.output_tag);
        self.definitions.push(def);
        Ok(())
    }

    /// Finds a keyword by id or display name.
    pub fn lookup(&self, name: &str) -> Option<&KeywordDefinition> {
        self.by_name
            .get(&normalize_name(name))
            .map(|&i| &self.definitions[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn definitions(&self) -> impl Iterator<Item = &KeywordDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// True if any of `keywords` makes its content a raw zone.
    pub fn is_raw_zone<S: AsRef<str>>(&self, keywords: &[S]) -> bool {
        keywords
            .iter()
            .any(|k| self.lookup(k.as_ref()).is_some_and(KeywordDefinition::is_code))
    }

    /// True if `node_type` may appear in a parsed node tree.
    pub fn is_known_node_type(&self, node_type: &str) -> bool {
        node_type == ERROR_NODE
            || node_type == UNKNOWN_KEYWORD_NODE
            || STRUCTURAL_TAGS.contains(&node_type)
            || self.definitions.iter().any(|d| d.output_tag == node_type)
    }
}

fn normalize_name(name: &str) -> String {
    let name = name.trim();
    if name.is_ascii() {
        name.to_ascii_lowercase()
    } else {
        name.to_string()
    }
}

fn is_element_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}
