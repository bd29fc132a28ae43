use crate::parsing::keywords::attributes::is_dangerous_scheme;
use crate::parsing::node::Node;
use crate::registry::KeywordRegistry;

/// Panics if any node has a type the registry does not know, or an attribute
/// value that starts with a dangerous scheme.
pub fn check(registry: &KeywordRegistry, nodes: &[Node]) {
    for node in nodes.iter().flat_map(Node::walk) {
        assert!(
            registry.is_known_node_type(&node.node_type),
            "unknown node type {:?}",
            node.node_type
        );
        for (key, value) in &node.attributes {
            assert!(
                !is_dangerous_scheme(value),
                "attribute {key}={value:?} on {} carries a dangerous scheme",
                node.node_type
            );
        }
    }
}
