//! Bounded-depth shortest path over the friendship graph

use super::error::{SocialError, SocialResult};
use super::person::Person;
use super::schema;
use crate::config::SocialConfig;
use crate::graph::{Direction, NodeId, Transaction};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use tracing::debug;

/// Breadth-first search from `source` to `target` over friendships
///
/// Returns the people along one shortest path, both ends included. Each node
/// keeps the first neighbour that discovered it, so among equally short paths
/// the one found first under adjacency order wins. The search stops as soon
/// as `target` is discovered and never expands past `max_depth` hops.
pub fn shortest_path<T: Transaction + ?Sized>(
    tx: &T,
    source: Person,
    target: Person,
    max_depth: usize,
) -> SocialResult<Vec<Person>> {
    Person::load(tx, source.id())?;
    Person::load(tx, target.id())?;

    if source == target {
        return Ok(vec![source]);
    }

    let friend = schema::friend();
    let mut queue = VecDeque::new();
    let mut parents: FxHashMap<NodeId, Option<NodeId>> = FxHashMap::default();

    queue.push_back((source.id(), 0usize));
    parents.insert(source.id(), None);

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }

        for next in tx.adjacency(current, &friend, Direction::Both)? {
            if parents.contains_key(&next) {
                continue;
            }
            parents.insert(next, Some(current));

            if next == target.id() {
                let path = reconstruct(&parents, next);
                debug!(
                    "Path {} -> {} found with {} hop(s)",
                    source.id(),
                    target.id(),
                    path.len() - 1
                );
                return Ok(path);
            }
            queue.push_back((next, depth + 1));
        }
    }

    debug!(
        "No path {} -> {} within {} hop(s), {} node(s) visited",
        source.id(),
        target.id(),
        max_depth,
        parents.len()
    );
    Err(SocialError::NotFound(format!(
        "no path from {} to {} within {} hop(s)",
        source.id(),
        target.id(),
        max_depth
    )))
}

fn reconstruct(parents: &FxHashMap<NodeId, Option<NodeId>>, end: NodeId) -> Vec<Person> {
    let mut path = Vec::new();
    let mut current = Some(end);
    while let Some(node) = current {
        path.push(Person::from_node(node));
        current = parents.get(&node).copied().flatten();
    }
    path.reverse();
    path
}

/// Shortest-path search with a fixed depth bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathFinder {
    max_depth: usize,
}

impl PathFinder {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn from_config(config: &SocialConfig) -> Self {
        Self::new(config.max_path_depth)
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn find<T: Transaction + ?Sized>(&self, tx: &T, source: Person, target: Person) -> SocialResult<Vec<Person>> {
        shortest_path(tx, source, target, self.max_depth)
    }
}

impl Default for PathFinder {
    fn default() -> Self {
        Self::from_config(&SocialConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphStore, MemoryGraph, MemoryTransaction, PropertyValue};

    fn people(tx: &mut MemoryTransaction, n: usize) -> Vec<Person> {
        (0..n)
            .map(|i| {
                let id = tx.create_node(&schema::person()).unwrap();
                tx.set_property(id, schema::NAME, PropertyValue::from(format!("p{}", i)))
                    .unwrap();
                Person::from_node(id)
            })
            .collect()
    }

    #[test]
    fn test_chain_path_and_depth_bound() {
        let graph = MemoryGraph::new();
        let mut tx = graph.begin().unwrap();
        let p = people(&mut tx, 4);
        p[0].add_friend(&mut tx, &p[1]).unwrap();
        p[1].add_friend(&mut tx, &p[2]).unwrap();
        p[2].add_friend(&mut tx, &p[3]).unwrap();

        assert_eq!(shortest_path(&tx, p[0], p[3], 4).unwrap(), p);
        assert_eq!(shortest_path(&tx, p[0], p[3], 3).unwrap(), p);
        assert!(matches!(
            shortest_path(&tx, p[0], p[3], 2),
            Err(SocialError::NotFound(_))
        ));
        assert!(matches!(
            shortest_path(&tx, p[0], p[3], 1),
            Err(SocialError::NotFound(_))
        ));
    }

    #[test]
    fn test_same_person_and_zero_depth() {
        let graph = MemoryGraph::new();
        let mut tx = graph.begin().unwrap();
        let p = people(&mut tx, 2);
        p[0].add_friend(&mut tx, &p[1]).unwrap();

        assert_eq!(shortest_path(&tx, p[0], p[0], 0).unwrap(), vec![p[0]]);
        assert!(shortest_path(&tx, p[0], p[1], 0).is_err());
        assert_eq!(shortest_path(&tx, p[1], p[0], 1).unwrap(), vec![p[1], p[0]]);
    }

    #[test]
    fn test_cycle_terminates_and_first_discoverer_wins() {
        let graph = MemoryGraph::new();
        let mut tx = graph.begin().unwrap();
        // square: 0-1, 0-2, 1-3, 2-3 plus an unreachable 4
        let p = people(&mut tx, 5);
        p[0].add_friend(&mut tx, &p[1]).unwrap();
        p[0].add_friend(&mut tx, &p[2]).unwrap();
        p[1].add_friend(&mut tx, &p[3]).unwrap();
        p[2].add_friend(&mut tx, &p[3]).unwrap();

        assert_eq!(
            shortest_path(&tx, p[0], p[3], 10).unwrap(),
            vec![p[0], p[1], p[3]]
        );
        assert!(shortest_path(&tx, p[0], p[4], 10).is_err());
    }

    #[test]
    fn test_path_finder_uses_configured_depth() {
        let graph = MemoryGraph::new();
        let mut tx = graph.begin().unwrap();
        let p = people(&mut tx, 3);
        p[0].add_friend(&mut tx, &p[1]).unwrap();
        p[1].add_friend(&mut tx, &p[2]).unwrap();

        assert_eq!(PathFinder::default().max_depth(), 4);
        assert!(PathFinder::new(1).find(&tx, p[0], p[2]).is_err());
        assert_eq!(PathFinder::new(2).find(&tx, p[0], p[2]).unwrap().len(), 3);
    }
}
