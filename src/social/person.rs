//! Person handles and their friend and status operations
//!
//! A `Person` is an opaque, copyable handle around a node id. It holds no
//! graph state of its own: every operation takes the caller's unit of work.

use super::error::{SocialError, SocialResult};
use super::path;
use super::recommend;
use super::schema;
use super::status::{StatusChain, StatusFeed, StatusUpdate};
use crate::graph::{Direction, NodeId, Transaction};
use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::Serialize;
use tracing::debug;

/// Handle to a person node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Person {
    id: NodeId,
}

impl Person {
    pub(crate) fn from_node(id: NodeId) -> Self {
        Person { id }
    }

    /// Resolve a node id to a person, checking that it is one
    pub fn load<T: Transaction + ?Sized>(tx: &T, id: NodeId) -> SocialResult<Self> {
        if !tx.has_node(id) || !tx.has_label(id, &schema::person())? {
            return Err(SocialError::NotFound(format!("person {}", id)));
        }
        Ok(Person { id })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name<T: Transaction + ?Sized>(&self, tx: &T) -> SocialResult<String> {
        tx.get_property(self.id, schema::NAME)?
            .and_then(|v| v.as_string().map(str::to_string))
            .ok_or_else(|| SocialError::NotFound(format!("name of person {}", self.id)))
    }

    // ============================================================
    // Friends
    // ============================================================

    /// Befriend `other`. Befriending an existing friend is a no-op.
    pub fn add_friend<T: Transaction + ?Sized>(&self, tx: &mut T, other: &Person) -> SocialResult<()> {
        if self == other {
            return Err(SocialError::InvalidOperation(format!(
                "person {} cannot befriend themselves",
                self.id
            )));
        }
        if self.is_friend_of(tx, other)? {
            return Ok(());
        }
        tx.create_edge(self.id, other.id, &schema::friend())?;
        debug!("{} and {} are now friends", self.id, other.id);
        Ok(())
    }

    /// End the friendship with `other`; returns false if there was none
    pub fn remove_friend<T: Transaction + ?Sized>(&self, tx: &mut T, other: &Person) -> SocialResult<bool> {
        let friend = schema::friend();
        let removed =
            tx.delete_edge(self.id, other.id, &friend)? || tx.delete_edge(other.id, self.id, &friend)?;
        if removed {
            debug!("{} and {} are no longer friends", self.id, other.id);
        }
        Ok(removed)
    }

    pub fn is_friend_of<T: Transaction + ?Sized>(&self, tx: &T, other: &Person) -> SocialResult<bool> {
        Ok(self.friend_ids(tx)?.contains(&other.id))
    }

    /// Direct friends, in the order the friendships were made
    pub fn get_friends<T: Transaction + ?Sized>(&self, tx: &T) -> SocialResult<People> {
        Ok(People::new(self.friend_ids(tx)?))
    }

    pub fn nr_of_friends<T: Transaction + ?Sized>(&self, tx: &T) -> SocialResult<usize> {
        Ok(tx.degree(self.id, &schema::friend(), Direction::Both)?)
    }

    /// Everyone reachable through one direct friend, except this person.
    ///
    /// A direct friend who is also a friend of another friend is included.
    /// Order is discovery order: friends in friendship order, then their
    /// friends in theirs.
    pub fn friends_of_friends<T: Transaction + ?Sized>(&self, tx: &T) -> SocialResult<Vec<Person>> {
        let friend = schema::friend();
        let mut found = IndexSet::new();
        for direct in self.friend_ids(tx)? {
            for candidate in tx.adjacency(direct, &friend, Direction::Both)? {
                if candidate != self.id {
                    found.insert(candidate);
                }
            }
        }
        Ok(found.into_iter().map(Person::from_node).collect())
    }

    fn friend_ids<T: Transaction + ?Sized>(&self, tx: &T) -> SocialResult<Vec<NodeId>> {
        Ok(tx.adjacency(self.id, &schema::friend(), Direction::Both)?)
    }

    // ============================================================
    // Status updates
    // ============================================================

    /// Post a status update dated now
    pub fn add_status<T: Transaction + ?Sized>(&self, tx: &mut T, text: &str) -> SocialResult<StatusUpdate> {
        self.add_status_at(tx, text, Utc::now())
    }

    /// Post a status update with an explicit date.
    ///
    /// The date is clamped to the current newest update so a person's chain
    /// never goes back in time.
    pub fn add_status_at<T: Transaction + ?Sized>(
        &self,
        tx: &mut T,
        text: &str,
        date: DateTime<Utc>,
    ) -> SocialResult<StatusUpdate> {
        if text.trim().is_empty() {
            return Err(SocialError::InvalidArgument(
                "status text must not be empty".to_string(),
            ));
        }
        Person::load(tx, self.id)?;

        let previous = self.status_head(tx)?;
        let mut millis = date.timestamp_millis();
        if let Some(head) = previous {
            millis = millis.max(StatusUpdate::load(tx, head)?.date().timestamp_millis());
        }

        let update = StatusUpdate::create(tx, text, millis)?;
        if let Some(head) = previous {
            tx.delete_edge(self.id, head, &schema::status())?;
            tx.create_edge(update.id(), head, &schema::next())?;
        }
        tx.create_edge(self.id, update.id(), &schema::status())?;

        debug!("{} posted status update {}", self.id, update.id());
        Ok(update)
    }

    /// Own updates, newest first
    pub fn get_status<'t, T: Transaction + ?Sized>(&self, tx: &'t T) -> SocialResult<StatusChain<'t, T>> {
        Ok(StatusChain::new(tx, self.status_head(tx)?))
    }

    /// All direct friends' updates merged, most recent first
    pub fn friend_statuses<'t, T: Transaction + ?Sized>(&self, tx: &'t T) -> SocialResult<StatusFeed<'t, T>> {
        let friends: Vec<Person> = self.get_friends(tx)?.collect();
        StatusFeed::for_people(tx, &friends)
    }

    pub(crate) fn status_head<T: Transaction + ?Sized>(&self, tx: &T) -> SocialResult<Option<NodeId>> {
        Ok(tx
            .adjacency(self.id, &schema::status(), Direction::Outgoing)?
            .first()
            .copied())
    }

    // ============================================================
    // Graph queries
    // ============================================================

    /// Shortest friendship path to `other` of at most `max_depth` hops
    pub fn shortest_path_to<T: Transaction + ?Sized>(
        &self,
        tx: &T,
        other: &Person,
        max_depth: usize,
    ) -> SocialResult<Vec<Person>> {
        path::shortest_path(tx, *self, *other, max_depth)
    }

    /// Up to `limit` friends-of-friends, best match first
    pub fn friend_recommendation<T: Transaction + ?Sized>(&self, tx: &T, limit: usize) -> SocialResult<Vec<Person>> {
        Ok(recommend::recommend(tx, *self, limit)?
            .into_iter()
            .map(|r| r.person)
            .collect())
    }
}

/// Snapshot of person handles taken when the sequence was requested
///
/// Owns its ids, so the unit of work may be modified (e.g. people deleted)
/// while iterating.
#[derive(Debug, Clone)]
pub struct People {
    ids: std::vec::IntoIter<NodeId>,
}

impl People {
    pub(crate) fn new(ids: Vec<NodeId>) -> Self {
        People {
            ids: ids.into_iter(),
        }
    }
}

impl Iterator for People {
    type Item = Person;

    fn next(&mut self) -> Option<Person> {
        self.ids.next().map(Person::from_node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl ExactSizeIterator for People {}
