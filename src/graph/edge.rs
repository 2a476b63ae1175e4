//! Edge records for the property graph
//!
//! Edges are directed and typed. The store keeps at most one edge per
//! `(source, target, type)` triple and records each edge on both endpoints,
//! so undirected relations are modelled by traversing with `Direction::Both`.

use super::types::{Direction, EdgeType, NodeId};
use serde::{Deserialize, Serialize};

/// A directed edge in the property graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source node (edge goes FROM this node)
    pub source: NodeId,

    /// Target node (edge goes TO this node)
    pub target: NodeId,

    /// Type of relationship (e.g., "FRIEND", "STATUS")
    pub edge_type: EdgeType,
}

impl Edge {
    /// Create a new directed edge
    pub fn new(source: NodeId, target: NodeId, edge_type: impl Into<EdgeType>) -> Self {
        Edge {
            source,
            target,
            edge_type: edge_type.into(),
        }
    }
}

/// One edge as seen from one of its endpoints
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdjacentEdge {
    pub edge_type: EdgeType,
    /// `Outgoing` if the owning node is the source, `Incoming` if it is the target
    pub direction: Direction,
    /// The node at the other end
    pub other: NodeId,
}

impl AdjacentEdge {
    pub fn new(edge_type: EdgeType, direction: Direction, other: NodeId) -> Self {
        AdjacentEdge {
            edge_type,
            direction,
            other,
        }
    }

    /// Reconstruct the directed edge, given the node this entry belongs to
    pub fn to_edge(&self, owner: NodeId) -> Edge {
        match self.direction {
            Direction::Incoming => Edge::new(self.other, owner, self.edge_type.clone()),
            _ => Edge::new(owner, self.other, self.edge_type.clone()),
        }
    }
}
