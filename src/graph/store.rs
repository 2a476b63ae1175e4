//! Graph storage capability consumed by the social engine
//!
//! The engine never talks to a concrete storage engine. It needs a store that
//! can open a unit of work, and a unit of work that offers node/edge CRUD,
//! adjacency, and index lookups. `MemoryGraph` is the reference implementation;
//! an adapter for any other engine only has to implement these two traits.

use super::property::PropertyValue;
use super::types::{Direction, EdgeType, Label, NodeId};
use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Node {0} still has {1} attached edge(s)")]
    NodeHasEdges(NodeId, usize),

    #[error("Edge {from} -[{edge_type}]-> {to} already exists")]
    EdgeAlreadyExists {
        from: NodeId,
        to: NodeId,
        edge_type: EdgeType,
    },

    #[error("Invalid edge: endpoint {0} does not exist")]
    InvalidEdgeEndpoint(NodeId),

    #[error("Write conflict on {0}: modified by a concurrent unit of work")]
    Conflict(String),

    #[error("Graph state lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A graph store that hands out units of work
pub trait GraphStore {
    type Tx<'a>: Transaction
    where
        Self: 'a;

    /// Begin a unit of work. Dropping it without `commit` rolls it back.
    fn begin(&self) -> StoreResult<Self::Tx<'_>>;
}

/// A unit of work against a graph store
///
/// Reads observe the unit's own uncommitted writes. Isolation from other
/// units of work, and conflict detection between them, belong to the store.
pub trait Transaction {
    /// Create a node carrying a single label
    fn create_node(&mut self, label: &Label) -> StoreResult<NodeId>;

    /// Delete a node. Fails with `NodeHasEdges` while any edge is attached.
    fn delete_node(&mut self, id: NodeId) -> StoreResult<()>;

    fn has_node(&self, id: NodeId) -> bool;

    fn has_label(&self, id: NodeId, label: &Label) -> StoreResult<bool>;

    fn set_property(&mut self, id: NodeId, key: &str, value: PropertyValue) -> StoreResult<()>;

    fn get_property(&self, id: NodeId, key: &str) -> StoreResult<Option<PropertyValue>>;

    /// Create a directed edge. At most one edge per `(from, to, type)`.
    fn create_edge(&mut self, from: NodeId, to: NodeId, edge_type: &EdgeType) -> StoreResult<()>;

    /// Delete a directed edge; returns whether it existed
    fn delete_edge(&mut self, from: NodeId, to: NodeId, edge_type: &EdgeType) -> StoreResult<bool>;

    /// Neighbours over edges of `edge_type`, in the order those edges were
    /// attached to `id`
    fn adjacency(&self, id: NodeId, edge_type: &EdgeType, direction: Direction) -> StoreResult<Vec<NodeId>>;

    fn degree(&self, id: NodeId, edge_type: &EdgeType, direction: Direction) -> StoreResult<usize> {
        Ok(self.adjacency(id, edge_type, direction)?.len())
    }

    /// All nodes with `label`, in creation order
    fn nodes_by_label(&self, label: &Label) -> StoreResult<Vec<NodeId>>;

    /// Declare a property index (idempotent)
    fn create_index(&mut self, label: &Label, key: &str) -> StoreResult<()>;

    /// First node with `label` whose `key` equals `value`
    fn index_lookup(&self, label: &Label, key: &str, value: &PropertyValue) -> StoreResult<Option<NodeId>>;

    /// Store-wide monotonic sequence; values are never handed out twice
    fn next_sequence(&mut self) -> StoreResult<u64>;

    fn commit(self) -> StoreResult<()>
    where
        Self: Sized;

    fn rollback(self) -> StoreResult<()>
    where
        Self: Sized;
}
