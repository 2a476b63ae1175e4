//! Property graph storage
//!
//! The social engine reads and writes through the [`GraphStore`] and
//! [`Transaction`] traits:
//! - nodes with labels and typed properties
//! - directed typed edges, at most one per `(source, target, type)`
//! - property indices for lookups by value
//! - [`MemoryGraph`], an in-memory store with snapshot isolation

pub mod edge;
pub mod index;
pub mod memory;
pub mod node;
pub mod property;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::{AdjacentEdge, Edge};
pub use index::{IndexManager, PropertyIndex};
pub use memory::{MemoryGraph, MemoryTransaction};
pub use node::Node;
pub use property::{PropertyMap, PropertyValue};
pub use store::{GraphStore, StoreError, StoreResult, Transaction};
pub use types::{Direction, EdgeType, Label, NodeId};
