//! Node record stored by the in-memory graph

use super::property::{PropertyMap, PropertyValue};
use super::types::{Label, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A node in the property graph
///
/// Nodes can have:
/// - A unique ID
/// - Labels
/// - Properties (key-value pairs)
/// - The commit version that last modified them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,

    /// Commit version that last modified this node or its edges
    pub version: u64,

    /// Set of labels for this node
    pub labels: HashSet<Label>,

    /// Properties associated with this node
    pub properties: PropertyMap,
}

impl Node {
    /// Create a new node with a single label
    pub fn new(id: NodeId, label: impl Into<Label>) -> Self {
        let mut labels = HashSet::new();
        labels.insert(label.into());

        Node {
            id,
            version: 0,
            labels,
            properties: PropertyMap::new(),
        }
    }

    /// Check if node has a specific label
    pub fn has_label(&self, label: &Label) -> bool {
        self.labels.contains(label)
    }

    /// Set a property value, returning the previous one
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Option<PropertyValue> {
        self.properties.insert(key.into(), value.into())
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_node() {
        let node = Node::new(NodeId::new(1), "Person");
        assert_eq!(node.id, NodeId::new(1));
        assert_eq!(node.version, 0);
        assert!(node.has_label(&Label::new("Person")));
        assert!(!node.has_label(&Label::new("StatusUpdate")));
    }

    #[test]
    fn test_node_properties() {
        let mut node = Node::new(NodeId::new(4), "Person");

        assert_eq!(node.set_property("name", "Alice"), None);
        let old = node.set_property("name", "Alicia");
        assert_eq!(old, Some(PropertyValue::from("Alice")));

        assert_eq!(node.get_property("name").unwrap().as_string(), Some("Alicia"));
        assert_eq!(node.properties.len(), 1);
    }

    #[test]
    fn test_node_equality() {
        let node1 = Node::new(NodeId::new(7), "Person");
        let mut node2 = Node::new(NodeId::new(7), "Person");
        node2.set_property("name", "x");
        let node3 = Node::new(NodeId::new(8), "Person");

        assert_eq!(node1, node2); // Same ID
        assert_ne!(node1, node3); // Different ID
    }
}
