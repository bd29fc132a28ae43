use std::fmt::Write;

use crate::parsing::node::{Node, NodeContent};

/// Text rendering of `nodes` followed by an `errors:` section if any.
///
/// One line per node: type, then `{k="v", ..}` attributes, then `[k=v; ..]`
/// metadata. Text content goes on its own line below the node, debug-quoted.
pub fn dump(nodes: &[Node], errors: &[String]) -> String {
    let mut out = String::new();
    for node in nodes {
        dump_node(&mut out, node, 0);
    }
    if !errors.is_empty() {
        out.push_str("errors:\n");
        for error in errors {
            let _ = writeln!(out, "  - {error}");
        }
    }
    out.truncate(out.trim_end().len());
    out
}

fn dump_node(out: &mut String, node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);
    out.push_str(&node.node_type);
    if !node.attributes.is_empty() {
        let attrs: Vec<_> = node
            .attributes
            .iter()
            .map(|(k, v)| format!("{k}={v:?}"))
            .collect();
        let _ = write!(out, " {{{}}}", attrs.join(", "));
    }
    if !node.metadata.is_empty() {
        let meta: Vec<_> = node
            .metadata
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        let _ = write!(out, " [{}]", meta.join("; "));
    }
    out.push('\n');
    match &node.content {
        NodeContent::Text(text) => {
            if !text.is_empty() {
                let _ = writeln!(out, "{indent}  {text:?}");
            }
        }
        NodeContent::Children(children) => {
            for child in children {
                dump_node(out, child, depth + 1);
            }
        }
    }
}
