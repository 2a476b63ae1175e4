//! Property indices for fast lookups by `(label, property, value)`

use super::property::PropertyValue;
use super::types::{Label, NodeId};
use indexmap::IndexSet;
use std::collections::{BTreeMap, HashMap};

/// Index for a specific property on a specific label
#[derive(Debug, Clone, Default)]
pub struct PropertyIndex {
    /// Value -> NodeIds in insertion order
    index: BTreeMap<PropertyValue, IndexSet<NodeId>>,
}

impl PropertyIndex {
    pub fn new() -> Self {
        Self {
            index: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, value: PropertyValue, node_id: NodeId) {
        self.index.entry(value).or_default().insert(node_id);
    }

    pub fn remove(&mut self, value: &PropertyValue, node_id: NodeId) {
        if let Some(nodes) = self.index.get_mut(value) {
            nodes.shift_remove(&node_id);
            if nodes.is_empty() {
                self.index.remove(value);
            }
        }
    }

    pub fn get(&self, value: &PropertyValue) -> Vec<NodeId> {
        self.index
            .get(value)
            .map(|nodes| nodes.iter().copied().collect())
            .unwrap_or_default()
    }
}

/// Key for identifying a property index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyIndexKey {
    pub label: Label,
    pub property: String,
}

impl PropertyIndexKey {
    pub fn new(label: &Label, property: &str) -> Self {
        Self {
            label: label.clone(),
            property: property.to_string(),
        }
    }
}

/// All property indices of one graph state
///
/// Plain data: every unit of work carries its own copy, so no interior locking.
#[derive(Debug, Clone, Default)]
pub struct IndexManager {
    indices: HashMap<PropertyIndexKey, PropertyIndex>,
}

impl IndexManager {
    pub fn new() -> Self {
        Self {
            indices: HashMap::new(),
        }
    }

    /// Declare an index; returns false if it already existed
    pub fn create_index(&mut self, label: &Label, property: &str) -> bool {
        let key = PropertyIndexKey::new(label, property);
        if self.indices.contains_key(&key) {
            return false;
        }
        self.indices.insert(key, PropertyIndex::new());
        true
    }

    /// Check if an index exists
    pub fn has_index(&self, label: &Label, property: &str) -> bool {
        self.indices.contains_key(&PropertyIndexKey::new(label, property))
    }

    /// Update index when a node property is set/changed
    pub fn index_insert(&mut self, label: &Label, property: &str, value: PropertyValue, node_id: NodeId) {
        if let Some(index) = self.indices.get_mut(&PropertyIndexKey::new(label, property)) {
            index.insert(value, node_id);
        }
    }

    /// Update index when a node property is removed (or old value replaced)
    pub fn index_remove(&mut self, label: &Label, property: &str, value: &PropertyValue, node_id: NodeId) {
        if let Some(index) = self.indices.get_mut(&PropertyIndexKey::new(label, property)) {
            index.remove(value, node_id);
        }
    }

    /// Nodes holding `value`, or `None` when no index is declared for the key
    pub fn lookup(&self, label: &Label, property: &str, value: &PropertyValue) -> Option<Vec<NodeId>> {
        self.indices
            .get(&PropertyIndexKey::new(label, property))
            .map(|index| index.get(value))
    }
}
