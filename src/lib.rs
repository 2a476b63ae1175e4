//! Socnet social graph engine
//!
//! A social network modelled as a property graph: people, friendships and
//! time-ordered status updates, with the structural queries run over them.
//!
//! # Architecture
//!
//! - [`graph`]: the storage capability (`GraphStore` / `Transaction` traits)
//!   and `MemoryGraph`, an in-memory store with snapshot isolation and
//!   first-committer-wins conflict detection
//! - [`social`]: people, friendships, status chains and feeds, bounded
//!   shortest paths and friend recommendations
//! - [`config`]: engine tunables loaded from YAML
//!
//! Every social operation runs inside a unit of work opened by the caller and
//! becomes visible to others only when that unit commits.
//!
//! ## Example Usage
//!
//! ```rust
//! use socnet::graph::{GraphStore, MemoryGraph, Transaction};
//! use socnet::social::PersonRepository;
//! use socnet::SocialConfig;
//!
//! let graph = MemoryGraph::new();
//! let mut tx = graph.begin().unwrap();
//! let repo = PersonRepository::open(&mut tx, SocialConfig::default()).unwrap();
//!
//! let alice = repo.create_person(&mut tx, "alice").unwrap();
//! let bob = repo.create_person(&mut tx, "bob").unwrap();
//! alice.add_friend(&mut tx, &bob).unwrap();
//! bob.add_status(&mut tx, "hello").unwrap();
//! tx.commit().unwrap();
//!
//! let tx = graph.begin().unwrap();
//! let feed: Vec<_> = alice.friend_statuses(&tx).unwrap().collect();
//! assert_eq!(feed.len(), 1);
//! assert_eq!(feed[0].as_ref().unwrap().text(), "hello");
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod graph;
pub mod social;

// Re-export main types for convenience
pub use config::{ConfigError, ConfigResult, SocialConfig};

pub use graph::{
    Direction, EdgeType, GraphStore, Label, MemoryGraph, MemoryTransaction, NodeId,
    PropertyValue, StoreError, StoreResult, Transaction,
};

pub use social::{
    commit, PathFinder, People, Person, PersonRepository, Recommendation, RecommendationEngine,
    SocialError, SocialResult, StatusFeed, StatusUpdate,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
