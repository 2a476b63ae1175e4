//! In-memory graph storage
//!
//! Reference implementation of [`GraphStore`]. The committed graph lives behind
//! a shared `RwLock`; each unit of work runs against a snapshot of it, copied
//! privately on the unit's first write:
//! - reads see the unit's own writes and nothing uncommitted from other units
//! - every node modified by a unit (adding or removing an edge modifies both
//!   endpoints) has its base version recorded
//! - commit fails with `StoreError::Conflict` if any of those nodes, or any
//!   indexed value the unit claimed, changed since the snapshot was taken
//!   (first committer wins), otherwise it writes the touched nodes back
//!   atomically under the write lock
//!
//! Nodes iterate in creation order and adjacency in edge-attachment order, so
//! every traversal over a fixed graph is reproducible.

use super::edge::{AdjacentEdge, Edge};
use super::index::{IndexManager, PropertyIndexKey};
use super::node::Node;
use super::property::PropertyValue;
use super::store::{GraphStore, StoreError, StoreResult, Transaction};
use super::types::{Direction, EdgeType, Label, NodeId};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard};
use tracing::{debug, warn};

/// Graph contents: one committed copy, plus one working copy per unit of work
#[derive(Debug, Clone, Default)]
struct GraphState {
    /// Nodes in creation order
    nodes: IndexMap<NodeId, Node>,

    /// Per-node edge entries in attachment order (each edge appears on both endpoints)
    adjacency: HashMap<NodeId, IndexSet<AdjacentEdge>>,

    /// Label index for fast lookups
    label_index: HashMap<Label, IndexSet<NodeId>>,

    /// Declared property indices
    property_index: IndexManager,

    /// Last commit version
    version: u64,
}

impl GraphState {
    fn node(&self, id: NodeId) -> StoreResult<&Node> {
        self.nodes.get(&id).ok_or(StoreError::NodeNotFound(id))
    }

    fn attached_edges(&self, id: NodeId) -> usize {
        self.adjacency.get(&id).map_or(0, |adj| adj.len())
    }

    fn insert_node(&mut self, node: Node) {
        for label in &node.labels {
            self.label_index.entry(label.clone()).or_default().insert(node.id);
        }
        self.reindex(None, Some(&node));
        self.adjacency.entry(node.id).or_default();
        self.nodes.insert(node.id, node);
    }

    fn remove_node(&mut self, id: NodeId) -> StoreResult<Node> {
        let attached = self.attached_edges(id);
        if attached > 0 {
            return Err(StoreError::NodeHasEdges(id, attached));
        }
        let node = self.nodes.shift_remove(&id).ok_or(StoreError::NodeNotFound(id))?;
        for label in &node.labels {
            if let Some(node_set) = self.label_index.get_mut(label) {
                node_set.shift_remove(&id);
            }
        }
        self.reindex(Some(&node), None);
        self.adjacency.remove(&id);
        Ok(node)
    }

    fn set_property(&mut self, id: NodeId, key: &str, value: PropertyValue) -> StoreResult<()> {
        let node = self.nodes.get_mut(&id).ok_or(StoreError::NodeNotFound(id))?;
        let old = node.set_property(key, value.clone());
        if old.as_ref() == Some(&value) {
            return Ok(());
        }
        let labels: Vec<Label> = node.labels.iter().cloned().collect();
        for label in &labels {
            if let Some(old) = &old {
                self.property_index.index_remove(label, key, old, id);
            }
            self.property_index.index_insert(label, key, value.clone(), id);
        }
        Ok(())
    }

    /// Move index entries from `old` to `new` for every property whose value changed.
    /// Labels never change after creation, so both sides share one label set.
    fn reindex(&mut self, old: Option<&Node>, new: Option<&Node>) {
        if let Some(old) = old {
            for label in &old.labels {
                for (key, value) in &old.properties {
                    if new.and_then(|n| n.get_property(key)) != Some(value) {
                        self.property_index.index_remove(label, key, value, old.id);
                    }
                }
            }
        }
        if let Some(new) = new {
            for label in &new.labels {
                for (key, value) in &new.properties {
                    if old.and_then(|n| n.get_property(key)) != Some(value) {
                        self.property_index.index_insert(label, key, value.clone(), new.id);
                    }
                }
            }
        }
    }

    fn add_edge(&mut self, from: NodeId, to: NodeId, edge_type: &EdgeType) -> StoreResult<()> {
        if !self.nodes.contains_key(&from) {
            return Err(StoreError::InvalidEdgeEndpoint(from));
        }
        if !self.nodes.contains_key(&to) {
            return Err(StoreError::InvalidEdgeEndpoint(to));
        }

        let outgoing = AdjacentEdge::new(edge_type.clone(), Direction::Outgoing, to);
        if self.adjacency.get(&from).map_or(false, |adj| adj.contains(&outgoing)) {
            return Err(StoreError::EdgeAlreadyExists {
                from,
                to,
                edge_type: edge_type.clone(),
            });
        }

        self.adjacency.entry(from).or_default().insert(outgoing);
        self.adjacency
            .entry(to)
            .or_default()
            .insert(AdjacentEdge::new(edge_type.clone(), Direction::Incoming, from));
        Ok(())
    }

    fn remove_edge(&mut self, from: NodeId, to: NodeId, edge_type: &EdgeType) -> StoreResult<bool> {
        self.node(from)?;
        self.node(to)?;

        let outgoing = AdjacentEdge::new(edge_type.clone(), Direction::Outgoing, to);
        let removed = self
            .adjacency
            .get_mut(&from)
            .map_or(false, |adj| adj.shift_remove(&outgoing));
        if removed {
            let incoming = AdjacentEdge::new(edge_type.clone(), Direction::Incoming, from);
            if let Some(adj) = self.adjacency.get_mut(&to) {
                adj.shift_remove(&incoming);
            }
        }
        Ok(removed)
    }

    fn neighbours(&self, id: NodeId, edge_type: &EdgeType, direction: Direction) -> StoreResult<Vec<NodeId>> {
        self.node(id)?;
        Ok(self
            .adjacency
            .get(&id)
            .map(|adj| {
                adj.iter()
                    .filter(|e| &e.edge_type == edge_type && direction.matches(e.direction))
                    .map(|e| e.other)
                    .collect()
            })
            .unwrap_or_default())
    }

    fn nodes_with_label(&self, label: &Label) -> Vec<NodeId> {
        self.label_index
            .get(label)
            .map(|node_ids| node_ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Nodes with `label` whose `key` equals `value`; uses the index when declared
    fn entry(&self, label: &Label, key: &str, value: &PropertyValue) -> Vec<NodeId> {
        match self.property_index.lookup(label, key, value) {
            Some(ids) => ids,
            None => self
                .nodes_with_label(label)
                .into_iter()
                .filter(|id| self.nodes.get(id).and_then(|n| n.get_property(key)) == Some(value))
                .collect(),
        }
    }

    /// Declare an index and build it from existing nodes; false if it existed
    fn declare_index(&mut self, label: &Label, key: &str) -> bool {
        if !self.property_index.create_index(label, key) {
            return false;
        }
        for id in self.nodes_with_label(label) {
            let value = self.nodes.get(&id).and_then(|n| n.get_property(key)).cloned();
            if let Some(value) = value {
                self.property_index.index_insert(label, key, value, id);
            }
        }
        true
    }

    /// Copy node `id` (and its edge entries) from a committing unit's working state
    fn apply(&mut self, working: &GraphState, id: NodeId, version: u64) {
        let old = self.nodes.get(&id).cloned();
        match working.nodes.get(&id) {
            Some(node) => {
                let mut node = node.clone();
                node.version = version;
                self.reindex(old.as_ref(), Some(&node));
                if old.is_none() {
                    for label in &node.labels {
                        self.label_index.entry(label.clone()).or_default().insert(id);
                    }
                }
                let adjacency = working.adjacency.get(&id).cloned().unwrap_or_default();
                self.adjacency.insert(id, adjacency);
                // Replacing an existing key keeps its position
                self.nodes.insert(id, node);
            }
            None => {
                if let Some(old) = old {
                    for label in &old.labels {
                        if let Some(node_set) = self.label_index.get_mut(label) {
                            node_set.shift_remove(&id);
                        }
                    }
                    self.reindex(Some(&old), None);
                    self.nodes.shift_remove(&id);
                    self.adjacency.remove(&id);
                }
            }
        }
    }

    fn edges(&self) -> Vec<Edge> {
        self.nodes
            .keys()
            .flat_map(|&id| {
                self.adjacency
                    .get(&id)
                    .into_iter()
                    .flatten()
                    .filter(|e| e.direction == Direction::Outgoing)
                    .map(move |e| e.to_edge(id))
            })
            .collect()
    }
}

#[derive(Debug)]
struct Shared {
    /// Committed graph; each unit of work holds a clone of the `Arc` as its snapshot
    state: RwLock<Arc<GraphState>>,
    next_node_id: AtomicU64,
    next_sequence: AtomicU64,
    next_tx_id: AtomicU64,
}

/// In-memory graph store
///
/// Cheap to clone; clones share the same committed graph.
///
/// Beginning a unit of work only takes a reference to the committed graph,
/// so read-only units never copy it. The first write in a unit copies the
/// whole graph into the unit's working state, which costs O(V + E) once per
/// writing unit. A commit with no other commit since `begin` installs that
/// working state directly; otherwise it copies the touched nodes over, after
/// cloning the committed graph if an open unit still holds it as its snapshot.
#[derive(Debug, Clone)]
pub struct MemoryGraph {
    shared: Arc<Shared>,
}

impl MemoryGraph {
    /// Create a new empty graph store
    pub fn new() -> Self {
        MemoryGraph {
            shared: Arc::new(Shared {
                state: RwLock::new(Arc::new(GraphState::default())),
                next_node_id: AtomicU64::new(1),
                next_sequence: AtomicU64::new(1),
                next_tx_id: AtomicU64::new(1),
            }),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Arc<GraphState>>> {
        self.shared.state.read().map_err(|_| StoreError::Poisoned)
    }

    /// Number of committed nodes
    pub fn node_count(&self) -> StoreResult<usize> {
        Ok(self.read()?.nodes.len())
    }

    /// Number of committed edges
    pub fn edge_count(&self) -> StoreResult<usize> {
        Ok(self.read()?.edges().len())
    }

    /// All committed edges, grouped by source node in creation order
    pub fn edges(&self) -> StoreResult<Vec<Edge>> {
        Ok(self.read()?.edges())
    }

    /// Committed copy of a node
    pub fn get_node(&self, id: NodeId) -> StoreResult<Option<Node>> {
        Ok(self.read()?.nodes.get(&id).cloned())
    }

    /// Last commit version (0 before the first write commits)
    pub fn version(&self) -> StoreResult<u64> {
        Ok(self.read()?.version)
    }
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore for MemoryGraph {
    type Tx<'a> = MemoryTransaction;

    fn begin(&self) -> StoreResult<MemoryTransaction> {
        let snapshot = Arc::clone(&*self.read()?);
        let id = self.shared.next_tx_id.fetch_add(1, Ordering::SeqCst);
        debug!("Unit of work {} begins at version {}", id, snapshot.version);
        Ok(MemoryTransaction {
            shared: Arc::clone(&self.shared),
            id,
            snapshot,
            working: None,
            base_versions: IndexMap::new(),
            base_entries: HashMap::new(),
            created_indexes: Vec::new(),
            finished: false,
        })
    }
}

/// A unit of work against a [`MemoryGraph`]
#[derive(Debug)]
pub struct MemoryTransaction {
    shared: Arc<Shared>,
    id: u64,
    /// Committed graph as of `begin`
    snapshot: Arc<GraphState>,
    /// Private copy of the snapshot, made on the first write
    working: Option<GraphState>,
    /// Node -> version at snapshot time (None for nodes created by this unit), in touch order
    base_versions: IndexMap<NodeId, Option<u64>>,
    /// Indexed value -> holders at snapshot time
    base_entries: HashMap<(PropertyIndexKey, PropertyValue), Vec<NodeId>>,
    created_indexes: Vec<PropertyIndexKey>,
    finished: bool,
}

impl MemoryTransaction {
    /// The graph as this unit sees it
    fn view(&self) -> &GraphState {
        match &self.working {
            Some(working) => working,
            None => self.snapshot.as_ref(),
        }
    }

    fn write(&mut self) -> &mut GraphState {
        let snapshot = &self.snapshot;
        self.working.get_or_insert_with(|| GraphState::clone(snapshot))
    }

    fn touch(&mut self, id: NodeId) {
        let base = self.view().nodes.get(&id).map(|n| n.version);
        self.base_versions.entry(id).or_insert(base);
    }

    /// Record who holds `value` before this unit changes it, if the key is indexed
    fn claim(&mut self, label: &Label, key: &str, value: &PropertyValue) {
        if !self.view().property_index.has_index(label, key) {
            return;
        }
        let entry_key = (PropertyIndexKey::new(label, key), value.clone());
        if !self.base_entries.contains_key(&entry_key) {
            let holders = self.view().entry(label, key, value);
            self.base_entries.insert(entry_key, holders);
        }
    }
}

impl Transaction for MemoryTransaction {
    fn create_node(&mut self, label: &Label) -> StoreResult<NodeId> {
        let id = NodeId::new(self.shared.next_node_id.fetch_add(1, Ordering::SeqCst));
        self.touch(id);
        self.write().insert_node(Node::new(id, label.clone()));
        Ok(id)
    }

    fn delete_node(&mut self, id: NodeId) -> StoreResult<()> {
        let node = self.view().node(id)?.clone();
        let attached = self.view().attached_edges(id);
        if attached > 0 {
            return Err(StoreError::NodeHasEdges(id, attached));
        }
        for label in &node.labels {
            for (key, value) in &node.properties {
                self.claim(label, key, value);
            }
        }
        self.touch(id);
        self.write().remove_node(id)?;
        Ok(())
    }

    fn has_node(&self, id: NodeId) -> bool {
        self.view().nodes.contains_key(&id)
    }

    fn has_label(&self, id: NodeId, label: &Label) -> StoreResult<bool> {
        Ok(self.view().node(id)?.has_label(label))
    }

    fn set_property(&mut self, id: NodeId, key: &str, value: PropertyValue) -> StoreResult<()> {
        let node = self.view().node(id)?;
        let labels: Vec<Label> = node.labels.iter().cloned().collect();
        let old = node.get_property(key).cloned();
        for label in &labels {
            self.claim(label, key, &value);
            if let Some(old) = &old {
                self.claim(label, key, old);
            }
        }
        self.touch(id);
        self.write().set_property(id, key, value)
    }

    fn get_property(&self, id: NodeId, key: &str) -> StoreResult<Option<PropertyValue>> {
        Ok(self.view().node(id)?.get_property(key).cloned())
    }

    fn create_edge(&mut self, from: NodeId, to: NodeId, edge_type: &EdgeType) -> StoreResult<()> {
        self.write().add_edge(from, to, edge_type)?;
        self.touch(from);
        self.touch(to);
        Ok(())
    }

    fn delete_edge(&mut self, from: NodeId, to: NodeId, edge_type: &EdgeType) -> StoreResult<bool> {
        let removed = self.write().remove_edge(from, to, edge_type)?;
        if removed {
            self.touch(from);
            self.touch(to);
        }
        Ok(removed)
    }

    fn adjacency(&self, id: NodeId, edge_type: &EdgeType, direction: Direction) -> StoreResult<Vec<NodeId>> {
        self.view().neighbours(id, edge_type, direction)
    }

    fn nodes_by_label(&self, label: &Label) -> StoreResult<Vec<NodeId>> {
        Ok(self.view().nodes_with_label(label))
    }

    fn create_index(&mut self, label: &Label, key: &str) -> StoreResult<()> {
        if self.view().property_index.has_index(label, key) {
            return Ok(());
        }
        self.write().declare_index(label, key);
        self.created_indexes.push(PropertyIndexKey::new(label, key));
        Ok(())
    }

    fn index_lookup(&self, label: &Label, key: &str, value: &PropertyValue) -> StoreResult<Option<NodeId>> {
        Ok(self.view().entry(label, key, value).into_iter().next())
    }

    fn next_sequence(&mut self) -> StoreResult<u64> {
        Ok(self.shared.next_sequence.fetch_add(1, Ordering::SeqCst))
    }

    fn commit(mut self) -> StoreResult<()> {
        self.finished = true;
        let shared = Arc::clone(&self.shared);
        let mut state = shared.state.write().map_err(|_| StoreError::Poisoned)?;

        for (id, base) in &self.base_versions {
            let current = state.nodes.get(id).map(|n| n.version);
            if current != *base {
                warn!("Unit of work {} conflicts on {} (base {:?}, now {:?})", self.id, id, base, current);
                return Err(StoreError::Conflict(id.to_string()));
            }
        }
        for ((key, value), base) in &self.base_entries {
            if state.entry(&key.label, &key.property, value) != *base {
                warn!("Unit of work {} conflicts on {}.{} = {}", self.id, key.label, key.property, value);
                return Err(StoreError::Conflict(format!("{}.{} = {}", key.label, key.property, value)));
            }
        }

        let wrote = !self.base_versions.is_empty() || !self.created_indexes.is_empty();
        let mut working = match self.working.take() {
            Some(working) if wrote => working,
            _ => {
                debug!("Unit of work {} committed without writes", self.id);
                return Ok(());
            }
        };

        let version = state.version + 1;
        if Arc::ptr_eq(&*state, &self.snapshot) {
            // Nothing committed since begin: the working state becomes the graph
            for id in self.base_versions.keys() {
                if let Some(node) = working.nodes.get_mut(id) {
                    node.version = version;
                }
            }
            working.version = version;
            *state = Arc::new(working);
        } else {
            let committed = Arc::make_mut(&mut *state);
            for key in &self.created_indexes {
                committed.declare_index(&key.label, &key.property);
            }
            for id in self.base_versions.keys() {
                committed.apply(&working, *id, version);
            }
            committed.version = version;
        }

        debug!(
            "Unit of work {} committed version {} ({} node(s) written)",
            self.id,
            version,
            self.base_versions.len()
        );
        Ok(())
    }

    fn rollback(mut self) -> StoreResult<()> {
        self.finished = true;
        debug!("Unit of work {} rolled back", self.id);
        Ok(())
    }
}

impl Drop for MemoryTransaction {
    fn drop(&mut self) {
        if !self.finished {
            debug!("Unit of work {} dropped without commit, rolled back", self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> Label {
        Label::new("Person")
    }

    fn knows() -> EdgeType {
        EdgeType::new("KNOWS")
    }

    #[test]
    fn test_create_and_get_node() {
        let graph = MemoryGraph::new();
        let mut tx = graph.begin().unwrap();
        let node_id = tx.create_node(&person()).unwrap();
        tx.set_property(node_id, "name", "Alice".into()).unwrap();

        assert!(tx.has_node(node_id));
        assert!(tx.has_label(node_id, &person()).unwrap());
        assert_eq!(
            tx.get_property(node_id, "name").unwrap(),
            Some(PropertyValue::from("Alice"))
        );
        tx.commit().unwrap();

        assert_eq!(graph.node_count().unwrap(), 1);
        let node = graph.get_node(node_id).unwrap().unwrap();
        assert_eq!(node.version, 1);
        assert_eq!(graph.version().unwrap(), 1);
    }

    #[test]
    fn test_edge_validation() {
        let graph = MemoryGraph::new();
        let mut tx = graph.begin().unwrap();
        let node1 = tx.create_node(&person()).unwrap();
        let invalid_node = NodeId::new(999);

        let result = tx.create_edge(invalid_node, node1, &knows());
        assert_eq!(result, Err(StoreError::InvalidEdgeEndpoint(invalid_node)));

        let result = tx.create_edge(node1, invalid_node, &knows());
        assert_eq!(result, Err(StoreError::InvalidEdgeEndpoint(invalid_node)));
    }

    #[test]
    fn test_duplicate_edge_rejected() {
        let graph = MemoryGraph::new();
        let mut tx = graph.begin().unwrap();
        let a = tx.create_node(&person()).unwrap();
        let b = tx.create_node(&person()).unwrap();

        tx.create_edge(a, b, &knows()).unwrap();
        assert!(matches!(
            tx.create_edge(a, b, &knows()),
            Err(StoreError::EdgeAlreadyExists { .. })
        ));
        // The reverse direction is a different edge
        tx.create_edge(b, a, &knows()).unwrap();
    }

    #[test]
    fn test_adjacency_order_and_direction() {
        let graph = MemoryGraph::new();
        let mut tx = graph.begin().unwrap();
        let node1 = tx.create_node(&person()).unwrap();
        let node2 = tx.create_node(&person()).unwrap();
        let node3 = tx.create_node(&person()).unwrap();

        tx.create_edge(node1, node3, &knows()).unwrap();
        tx.create_edge(node2, node1, &knows()).unwrap();
        tx.create_edge(node1, node2, &EdgeType::new("FOLLOWS")).unwrap();

        assert_eq!(tx.adjacency(node1, &knows(), Direction::Outgoing).unwrap(), vec![node3]);
        assert_eq!(tx.adjacency(node1, &knows(), Direction::Incoming).unwrap(), vec![node2]);
        assert_eq!(
            tx.adjacency(node1, &knows(), Direction::Both).unwrap(),
            vec![node3, node2]
        );
        assert_eq!(tx.degree(node1, &knows(), Direction::Both).unwrap(), 2);
        assert_eq!(
            tx.adjacency(NodeId::new(42), &knows(), Direction::Both),
            Err(StoreError::NodeNotFound(NodeId::new(42)))
        );
    }

    #[test]
    fn test_delete_node_requires_detached_edges() {
        let graph = MemoryGraph::new();
        let mut tx = graph.begin().unwrap();
        let node1 = tx.create_node(&person()).unwrap();
        let node2 = tx.create_node(&person()).unwrap();
        tx.create_edge(node1, node2, &knows()).unwrap();

        assert_eq!(tx.delete_node(node1), Err(StoreError::NodeHasEdges(node1, 1)));

        assert!(tx.delete_edge(node1, node2, &knows()).unwrap());
        assert!(!tx.delete_edge(node1, node2, &knows()).unwrap());
        tx.delete_node(node1).unwrap();
        assert!(!tx.has_node(node1));
        tx.commit().unwrap();

        assert_eq!(graph.node_count().unwrap(), 1);
        assert_eq!(graph.edge_count().unwrap(), 0);
    }

    #[test]
    fn test_uncommitted_writes_are_isolated() {
        let graph = MemoryGraph::new();
        let mut writer = graph.begin().unwrap();
        let id = writer.create_node(&person()).unwrap();

        let reader = graph.begin().unwrap();
        assert!(!reader.has_node(id));
        assert!(writer.has_node(id));

        writer.commit().unwrap();
        // Snapshot taken before the commit stays unchanged
        assert!(!reader.has_node(id));
        assert!(graph.begin().unwrap().has_node(id));
    }

    #[test]
    fn test_drop_rolls_back() {
        let graph = MemoryGraph::new();
        {
            let mut tx = graph.begin().unwrap();
            tx.create_node(&person()).unwrap();
        }
        let mut tx = graph.begin().unwrap();
        tx.create_node(&person()).unwrap();
        tx.rollback().unwrap();

        assert_eq!(graph.node_count().unwrap(), 0);
        assert_eq!(graph.version().unwrap(), 0);
    }

    #[test]
    fn test_concurrent_modification_conflict() {
        let graph = MemoryGraph::new();
        let mut setup = graph.begin().unwrap();
        let a = setup.create_node(&person()).unwrap();
        let b = setup.create_node(&person()).unwrap();
        let c = setup.create_node(&person()).unwrap();
        setup.commit().unwrap();

        let mut first = graph.begin().unwrap();
        let mut second = graph.begin().unwrap();
        first.create_edge(a, b, &knows()).unwrap();
        second.create_edge(a, c, &knows()).unwrap();

        first.commit().unwrap();
        assert_eq!(second.commit(), Err(StoreError::Conflict(a.to_string())));

        let tx = graph.begin().unwrap();
        assert_eq!(tx.adjacency(a, &knows(), Direction::Both).unwrap(), vec![b]);
    }

    #[test]
    fn test_disjoint_units_both_commit() {
        let graph = MemoryGraph::new();
        let mut setup = graph.begin().unwrap();
        let a = setup.create_node(&person()).unwrap();
        let b = setup.create_node(&person()).unwrap();
        setup.commit().unwrap();

        let mut first = graph.begin().unwrap();
        let mut second = graph.begin().unwrap();
        first.set_property(a, "name", "a".into()).unwrap();
        second.set_property(b, "name", "b".into()).unwrap();
        first.commit().unwrap();
        second.commit().unwrap();

        assert_eq!(graph.version().unwrap(), 3);
    }

    #[test]
    fn test_index_lookup_and_claim_conflict() {
        let graph = MemoryGraph::new();
        let mut setup = graph.begin().unwrap();
        setup.create_index(&person(), "name").unwrap();
        setup.commit().unwrap();

        let mut first = graph.begin().unwrap();
        let mut second = graph.begin().unwrap();
        let x1 = first.create_node(&person()).unwrap();
        first.set_property(x1, "name", "x".into()).unwrap();
        let x2 = second.create_node(&person()).unwrap();
        second.set_property(x2, "name", "x".into()).unwrap();

        assert_eq!(
            first.index_lookup(&person(), "name", &"x".into()).unwrap(),
            Some(x1)
        );
        first.commit().unwrap();
        assert!(matches!(second.commit(), Err(StoreError::Conflict(_))));

        let tx = graph.begin().unwrap();
        assert_eq!(tx.index_lookup(&person(), "name", &"x".into()).unwrap(), Some(x1));
        assert_eq!(tx.index_lookup(&person(), "name", &"y".into()).unwrap(), None);
    }

    #[test]
    fn test_lookup_without_index_scans_label() {
        let graph = MemoryGraph::new();
        let mut tx = graph.begin().unwrap();
        let id = tx.create_node(&person()).unwrap();
        tx.set_property(id, "name", "solo".into()).unwrap();
        assert_eq!(tx.index_lookup(&person(), "name", &"solo".into()).unwrap(), Some(id));
    }

    #[test]
    fn test_node_order_survives_updates() {
        let graph = MemoryGraph::new();
        let mut tx = graph.begin().unwrap();
        let ids: Vec<NodeId> = (0..3).map(|_| tx.create_node(&person()).unwrap()).collect();
        tx.commit().unwrap();

        let mut tx = graph.begin().unwrap();
        tx.set_property(ids[0], "name", "first".into()).unwrap();
        tx.commit().unwrap();

        let tx = graph.begin().unwrap();
        assert_eq!(tx.nodes_by_label(&person()).unwrap(), ids);
    }

    #[test]
    fn test_sequences_are_monotonic_across_units() {
        let graph = MemoryGraph::new();
        let mut first = graph.begin().unwrap();
        let mut second = graph.begin().unwrap();
        let a = first.next_sequence().unwrap();
        let b = second.next_sequence().unwrap();
        let c = first.next_sequence().unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_edges_listing() {
        let graph = MemoryGraph::new();
        let mut tx = graph.begin().unwrap();
        let a = tx.create_node(&person()).unwrap();
        let b = tx.create_node(&person()).unwrap();
        tx.create_edge(a, b, &knows()).unwrap();
        tx.commit().unwrap();

        assert_eq!(graph.edges().unwrap(), vec![Edge::new(a, b, "KNOWS")]);
    }

    #[test]
    fn test_read_only_unit_shares_committed_state() {
        let graph = MemoryGraph::new();
        let mut setup = graph.begin().unwrap();
        let a = setup.create_node(&person()).unwrap();
        setup.commit().unwrap();

        let committed = Arc::clone(&*graph.read().unwrap());
        let reader = graph.begin().unwrap();
        assert!(reader.has_node(a));
        assert!(reader.working.is_none());
        assert!(Arc::ptr_eq(&reader.snapshot, &committed));

        let mut writer = graph.begin().unwrap();
        assert!(writer.working.is_none());
        let b = writer.create_node(&person()).unwrap();
        assert!(writer.working.is_some());
        writer.commit().unwrap();

        // The reader still holds the pre-commit graph
        assert!(Arc::ptr_eq(&reader.snapshot, &committed));
        assert!(!reader.has_node(b));
        assert_eq!(graph.get_node(b).unwrap().map(|n| n.version), Some(2));
        assert_eq!(committed.version, 1);
    }

    #[test]
    fn test_commit_after_other_commit_merges_touched_nodes() {
        let graph = MemoryGraph::new();
        let mut setup = graph.begin().unwrap();
        let a = setup.create_node(&person()).unwrap();
        let b = setup.create_node(&person()).unwrap();
        setup.commit().unwrap();

        let mut first = graph.begin().unwrap();
        let mut second = graph.begin().unwrap();
        first.set_property(a, "name", "a".into()).unwrap();
        let c = second.create_node(&person()).unwrap();
        second.create_edge(b, c, &knows()).unwrap();
        first.commit().unwrap();
        second.commit().unwrap();

        let tx = graph.begin().unwrap();
        assert_eq!(tx.get_property(a, "name").unwrap(), Some(PropertyValue::from("a")));
        assert_eq!(tx.adjacency(b, &knows(), Direction::Outgoing).unwrap(), vec![c]);
        assert_eq!(tx.nodes_by_label(&person()).unwrap(), vec![a, b, c]);
        assert_eq!(graph.get_node(a).unwrap().map(|n| n.version), Some(2));
        assert_eq!(graph.get_node(c).unwrap().map(|n| n.version), Some(3));
    }
}
