//! Person lifecycle: creation, lookup by name, enumeration and deletion

use super::error::{SocialError, SocialResult};
use super::path::PathFinder;
use super::person::{People, Person};
use super::recommend::RecommendationEngine;
use super::schema;
use crate::config::SocialConfig;
use crate::graph::{Direction, NodeId, PropertyValue, Transaction};
use tracing::{debug, info};

/// Entry point for finding and managing people
///
/// Stateless apart from its configuration; every call works inside the unit
/// of work handed to it. Only obtainable through [`PersonRepository::open`].
#[derive(Debug, Clone)]
pub struct PersonRepository {
    config: SocialConfig,
}

impl PersonRepository {
    /// Prepare the store for person operations and return a repository
    ///
    /// Declares the unique name index. Opening twice is harmless.
    pub fn open<T: Transaction + ?Sized>(tx: &mut T, config: SocialConfig) -> SocialResult<Self> {
        tx.create_index(&schema::person(), schema::NAME)?;
        debug!("Person repository opened with {:?}", config);
        Ok(Self { config })
    }

    pub fn config(&self) -> &SocialConfig {
        &self.config
    }

    /// Create a person with a unique name
    ///
    /// Ensures the name index exists in `tx`, so two units creating the same
    /// name conflict at commit even if `open` ran in a unit that never committed.
    pub fn create_person<T: Transaction + ?Sized>(&self, tx: &mut T, name: &str) -> SocialResult<Person> {
        if name.trim().is_empty() {
            return Err(SocialError::InvalidArgument(
                "person name must not be empty".to_string(),
            ));
        }
        tx.create_index(&schema::person(), schema::NAME)?;
        if self.find_person(tx, name)?.is_some() {
            return Err(SocialError::DuplicateName(name.to_string()));
        }

        let id = tx.create_node(&schema::person())?;
        tx.set_property(id, schema::NAME, PropertyValue::from(name))?;
        info!("Created person: {} ({})", name, id);
        Ok(Person::from_node(id))
    }

    pub fn get_person_by_name<T: Transaction + ?Sized>(&self, tx: &T, name: &str) -> SocialResult<Person> {
        self.find_person(tx, name)?
            .ok_or_else(|| SocialError::NotFound(format!("person named '{}'", name)))
    }

    /// Like `get_person_by_name`, but a miss is `None`
    pub fn find_person<T: Transaction + ?Sized>(&self, tx: &T, name: &str) -> SocialResult<Option<Person>> {
        match tx.index_lookup(&schema::person(), schema::NAME, &PropertyValue::from(name))? {
            Some(id) => Person::load(tx, id).map(Some),
            None => Ok(None),
        }
    }

    /// Every person, in creation order, as of this call
    pub fn get_all_persons<T: Transaction + ?Sized>(&self, tx: &T) -> SocialResult<People> {
        Ok(People::new(tx.nodes_by_label(&schema::person())?))
    }

    /// Delete a person with their friendships and status updates
    ///
    /// Edges go first, then the status chain from newest to oldest, then the
    /// person. A store without atomic commit that fails midway can leave the
    /// older part of the chain behind with no owner.
    pub fn delete_person<T: Transaction + ?Sized>(&self, tx: &mut T, person: &Person) -> SocialResult<()> {
        Person::load(tx, person.id())?;
        let id = person.id();

        let friends: Vec<Person> = person.get_friends(tx)?.collect();
        for friend in &friends {
            person.remove_friend(tx, friend)?;
        }

        let chain = self.status_chain_ids(tx, person)?;
        if let Some(&head) = chain.first() {
            tx.delete_edge(id, head, &schema::status())?;
        }
        let next = schema::next();
        for (i, &update) in chain.iter().enumerate() {
            if let Some(&older) = chain.get(i + 1) {
                tx.delete_edge(update, older, &next)?;
            }
            tx.delete_node(update)?;
        }

        tx.delete_node(id)?;
        info!(
            "Deleted person {} with {} friendship(s) and {} status update(s)",
            id,
            friends.len(),
            chain.len()
        );
        Ok(())
    }

    fn status_chain_ids<T: Transaction + ?Sized>(&self, tx: &T, person: &Person) -> SocialResult<Vec<NodeId>> {
        let next = schema::next();
        let mut ids = Vec::new();
        let mut current = person.status_head(tx)?;
        while let Some(update) = current {
            ids.push(update);
            current = tx.adjacency(update, &next, Direction::Outgoing)?.first().copied();
        }
        Ok(ids)
    }

    /// Path finder bounded by the configured depth
    pub fn path_finder(&self) -> PathFinder {
        PathFinder::from_config(&self.config)
    }

    /// Recommendation engine capped at the configured limit
    pub fn recommendation_engine(&self) -> RecommendationEngine {
        RecommendationEngine::from_config(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphStore, MemoryGraph};

    #[test]
    fn test_create_and_lookup() {
        let graph = MemoryGraph::new();
        let mut tx = graph.begin().unwrap();
        let repo = PersonRepository::open(&mut tx, SocialConfig::default()).unwrap();

        let alice = repo.create_person(&mut tx, "alice").unwrap();
        assert_eq!(repo.get_person_by_name(&tx, "alice").unwrap(), alice);
        assert_eq!(alice.name(&tx).unwrap(), "alice");
        assert_eq!(repo.find_person(&tx, "bob").unwrap(), None);
        assert!(matches!(
            repo.get_person_by_name(&tx, "bob"),
            Err(SocialError::NotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_and_empty_names() {
        let graph = MemoryGraph::new();
        let mut tx = graph.begin().unwrap();
        let repo = PersonRepository::open(&mut tx, SocialConfig::default()).unwrap();

        repo.create_person(&mut tx, "alice").unwrap();
        assert_eq!(
            repo.create_person(&mut tx, "alice"),
            Err(SocialError::DuplicateName("alice".to_string()))
        );
        assert!(matches!(
            repo.create_person(&mut tx, " "),
            Err(SocialError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_delete_cascades() {
        let graph = MemoryGraph::new();
        let mut tx = graph.begin().unwrap();
        let repo = PersonRepository::open(&mut tx, SocialConfig::default()).unwrap();

        let alice = repo.create_person(&mut tx, "alice").unwrap();
        let bob = repo.create_person(&mut tx, "bob").unwrap();
        alice.add_friend(&mut tx, &bob).unwrap();
        alice.add_status(&mut tx, "one").unwrap();
        alice.add_status(&mut tx, "two").unwrap();
        bob.add_status(&mut tx, "bob's").unwrap();

        repo.delete_person(&mut tx, &alice).unwrap();
        tx.commit().unwrap();

        assert_eq!(graph.node_count().unwrap(), 2);
        assert_eq!(graph.edge_count().unwrap(), 1);

        let tx = graph.begin().unwrap();
        assert!(repo.find_person(&tx, "alice").unwrap().is_none());
        assert_eq!(bob.nr_of_friends(&tx).unwrap(), 0);
        assert_eq!(repo.get_all_persons(&tx).unwrap().collect::<Vec<_>>(), vec![bob]);
    }

    #[test]
    fn test_delete_while_iterating() {
        let graph = MemoryGraph::new();
        let mut tx = graph.begin().unwrap();
        let repo = PersonRepository::open(&mut tx, SocialConfig::default()).unwrap();
        for name in ["a", "b", "c"] {
            repo.create_person(&mut tx, name).unwrap();
        }

        let everyone = repo.get_all_persons(&tx).unwrap();
        assert_eq!(everyone.len(), 3);
        for person in everyone {
            repo.delete_person(&mut tx, &person).unwrap();
        }
        assert_eq!(repo.get_all_persons(&tx).unwrap().count(), 0);
    }
}
