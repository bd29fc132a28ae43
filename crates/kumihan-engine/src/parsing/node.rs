use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::registry::{ERROR_NODE, UNKNOWN_KEYWORD_NODE};

/// Content of a [`Node`]: either plain text or child nodes owned by the parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NodeContent {
    Text(String),
    Children(Vec<Node>),
}

impl NodeContent {
    /// The text, if this is a text leaf.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            NodeContent::Text(s) => Some(s),
            NodeContent::Children(_) => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            NodeContent::Text(_) => &[],
            NodeContent::Children(c) => c,
        }
    }
}

/// A diagnostic or bookkeeping value attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Text(String),
    List(Vec<String>),
    Number(usize),
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Text(s) => f.write_str(s),
            MetaValue::List(items) => write!(f, "[{}]", items.join(", ")),
            MetaValue::Number(n) => write!(f, "{n}"),
        }
    }
}

/// One element of the parsed document tree.
///
/// Nodes are built during parsing and handed read-only to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub node_type: String,
    pub content: NodeContent,
    pub attributes: BTreeMap<String, String>,
    pub metadata: BTreeMap<String, MetaValue>,
}

impl Node {
    pub fn new(node_type: impl Into<String>, content: NodeContent) -> Self {
        Self {
            node_type: node_type.into(),
            content,
            attributes: BTreeMap::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// A plain `text` leaf.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new("text", NodeContent::Text(text.into()))
    }

    /// An element whose content is `children`, collapsed to text when the
    /// only child is a bare `text` node.
    pub fn element(node_type: impl Into<String>, mut children: Vec<Node>) -> Self {
        if children.len() == 1 && children[0].is_bare_text() {
            let only = children.remove(0);
            return Self::new(node_type, only.content);
        }
        Self::new(node_type, NodeContent::Children(children))
    }

    /// An `error` node carrying `message` and the source position.
    pub fn error(message: impl Into<String>, content: NodeContent, line: usize) -> Self {
        Self::new(ERROR_NODE, content)
            .with_meta("message", MetaValue::Text(message.into()))
            .with_meta("line", MetaValue::Number(line))
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: MetaValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn is_error(&self) -> bool {
        self.node_type == ERROR_NODE
    }

    pub fn is_unknown_keyword(&self) -> bool {
        self.node_type == UNKNOWN_KEYWORD_NODE
    }

    fn is_bare_text(&self) -> bool {
        self.node_type == "text" && self.attributes.is_empty() && self.metadata.is_empty()
    }

    /// Depth-first iterator over this node and all descendants.
    pub fn walk(&self) -> impl Iterator<Item = &Node> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.content.children().iter().rev());
            Some(node)
        })
    }
}

/// Appends `text` to `nodes`, merging with a trailing bare text node.
pub(crate) fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = nodes.last_mut()
        && last.is_bare_text()
        && let NodeContent::Text(s) = &mut last.content
    {
        s.push_str(text);
        return;
    }
    nodes.push(Node::text(text));
}
