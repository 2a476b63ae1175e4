//! Friend recommendations ranked by shared friends

use super::error::{SocialError, SocialResult};
use super::person::Person;
use super::schema;
use crate::config::SocialConfig;
use crate::graph::{Direction, Transaction};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};
use serde::Serialize;
use tracing::debug;

/// A recommended person and the number of friends they share with the query person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub person: Person,
    pub score: usize,
}

/// Rank the friends-of-friends of `person` who are not yet their friends
///
/// Every path `person - friend - candidate` adds one to the candidate's
/// score, so the score is the number of shared friends. Higher scores come
/// first; equal scores keep the order in which candidates were discovered.
pub fn recommend<T: Transaction + ?Sized>(
    tx: &T,
    person: Person,
    limit: usize,
) -> SocialResult<Vec<Recommendation>> {
    if limit == 0 {
        return Err(SocialError::InvalidArgument(
            "recommendation limit must be positive".to_string(),
        ));
    }
    Person::load(tx, person.id())?;

    let friend = schema::friend();
    let direct = tx.adjacency(person.id(), &friend, Direction::Both)?;
    let excluded: FxHashSet<_> = direct.iter().copied().chain(Some(person.id())).collect();

    let mut tally: IndexMap<_, usize, FxBuildHasher> = IndexMap::default();
    for via in &direct {
        for candidate in tx.adjacency(*via, &friend, Direction::Both)? {
            if !excluded.contains(&candidate) {
                *tally.entry(candidate).or_insert(0) += 1;
            }
        }
    }

    let mut ranked: Vec<Recommendation> = tally
        .into_iter()
        .map(|(id, score)| Recommendation {
            person: Person::from_node(id),
            score,
        })
        .collect();
    // stable: ties stay in discovery order
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    debug!(
        "{} candidate(s) for {}, returning up to {}",
        ranked.len(),
        person.id(),
        limit
    );
    ranked.truncate(limit);
    Ok(ranked)
}

/// Recommendation queries with a fixed result limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationEngine {
    limit: usize,
}

impl RecommendationEngine {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn from_config(config: &SocialConfig) -> Self {
        Self::new(config.recommendation_limit)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn recommend<T: Transaction + ?Sized>(&self, tx: &T, person: Person) -> SocialResult<Vec<Recommendation>> {
        recommend(tx, person, self.limit)
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::from_config(&SocialConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphStore, MemoryGraph, MemoryTransaction, PropertyValue};

    fn people(tx: &mut MemoryTransaction, names: &[&str]) -> Vec<Person> {
        names
            .iter()
            .map(|name| {
                let id = tx.create_node(&schema::person()).unwrap();
                tx.set_property(id, schema::NAME, PropertyValue::from(*name)).unwrap();
                Person::from_node(id)
            })
            .collect()
    }

    fn befriend(tx: &mut MemoryTransaction, a: Person, others: &[Person]) {
        for other in others {
            a.add_friend(tx, other).unwrap();
        }
    }

    #[test]
    fn test_shared_friends_score() {
        let graph = MemoryGraph::new();
        let mut tx = graph.begin().unwrap();
        let p = people(&mut tx, &["a", "b", "c", "d", "e"]);
        let (a, b, c, d, e) = (p[0], p[1], p[2], p[3], p[4]);
        befriend(&mut tx, a, &[b, c, d]);
        befriend(&mut tx, e, &[b, c, d]);

        let recs = recommend(&tx, a, 1).unwrap();
        assert_eq!(recs, vec![Recommendation { person: e, score: 3 }]);
    }

    #[test]
    fn test_higher_score_first() {
        let graph = MemoryGraph::new();
        let mut tx = graph.begin().unwrap();
        let p = people(&mut tx, &["a", "b", "c", "d", "e", "f"]);
        let (a, b, c, d, e, f) = (p[0], p[1], p[2], p[3], p[4], p[5]);
        befriend(&mut tx, a, &[b, c, d]);
        befriend(&mut tx, e, &[b]);
        befriend(&mut tx, f, &[b, c, d]);

        let ranked: Vec<Person> = recommend(&tx, a, 2).unwrap().into_iter().map(|r| r.person).collect();
        assert_eq!(ranked, vec![f, e]);
    }

    #[test]
    fn test_direct_friends_excluded_and_ties_keep_discovery_order() {
        let graph = MemoryGraph::new();
        let mut tx = graph.begin().unwrap();
        let p = people(&mut tx, &["a", "b", "c", "x", "y"]);
        let (a, b, c, x, y) = (p[0], p[1], p[2], p[3], p[4]);
        befriend(&mut tx, a, &[b, c]);
        b.add_friend(&mut tx, &c).unwrap();
        b.add_friend(&mut tx, &y).unwrap();
        c.add_friend(&mut tx, &x).unwrap();

        let recs = recommend(&tx, a, 10).unwrap();
        assert_eq!(
            recs,
            vec![
                Recommendation { person: y, score: 1 },
                Recommendation { person: x, score: 1 },
            ]
        );
    }

    #[test]
    fn test_zero_limit_rejected() {
        let graph = MemoryGraph::new();
        let mut tx = graph.begin().unwrap();
        let p = people(&mut tx, &["a"]);

        assert!(matches!(
            recommend(&tx, p[0], 0),
            Err(SocialError::InvalidArgument(_))
        ));
        assert!(recommend(&tx, p[0], 3).unwrap().is_empty());
        assert_eq!(RecommendationEngine::default().limit(), 10);
    }
}
