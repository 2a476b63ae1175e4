//! Status updates and feeds
//!
//! Each person's updates form a chain, newest first. A feed over several
//! people is a lazy k-way merge of their chains, ordered by
//! `(date, sequence)` descending. The sequence number is taken from the store
//! when the update is created, so two updates posted in the same millisecond
//! still have a fixed order.

use super::error::{SocialError, SocialResult};
use super::person::Person;
use super::schema;
use crate::graph::{Direction, NodeId, PropertyValue, Transaction};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// One status update, read from the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    id: NodeId,
    text: String,
    date: DateTime<Utc>,
    sequence: u64,
}

impl StatusUpdate {
    pub(crate) fn load<T: Transaction + ?Sized>(tx: &T, id: NodeId) -> SocialResult<Self> {
        let text = tx
            .get_property(id, schema::TEXT)?
            .and_then(|v| v.as_string().map(str::to_string))
            .ok_or_else(|| missing(id, schema::TEXT))?;
        let date = tx
            .get_property(id, schema::DATE)?
            .and_then(|v| v.as_datetime())
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .ok_or_else(|| missing(id, schema::DATE))?;
        let sequence = tx
            .get_property(id, schema::SEQUENCE)?
            .and_then(|v| v.as_integer())
            .ok_or_else(|| missing(id, schema::SEQUENCE))?;

        Ok(StatusUpdate {
            id,
            text,
            date,
            sequence: sequence as u64,
        })
    }

    /// Write a new update node; linking it into a chain is the caller's job
    pub(crate) fn create<T: Transaction + ?Sized>(
        tx: &mut T,
        text: &str,
        date_millis: i64,
    ) -> SocialResult<Self> {
        let sequence = tx.next_sequence()?;
        let id = tx.create_node(&schema::status_update())?;
        tx.set_property(id, schema::TEXT, PropertyValue::from(text))?;
        tx.set_property(id, schema::DATE, PropertyValue::DateTime(date_millis))?;
        tx.set_property(id, schema::SEQUENCE, PropertyValue::Integer(sequence as i64))?;
        Self::load(tx, id)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// The person who posted this update
    ///
    /// Walks the chain back to its head, then across the `STATUS` edge.
    pub fn person<T: Transaction + ?Sized>(&self, tx: &T) -> SocialResult<Person> {
        let mut current = self.id;
        loop {
            if let Some(&owner) = tx
                .adjacency(current, &schema::status(), Direction::Incoming)?
                .first()
            {
                return Person::load(tx, owner);
            }
            match tx
                .adjacency(current, &schema::next(), Direction::Incoming)?
                .first()
            {
                Some(&newer) => current = newer,
                None => {
                    return Err(SocialError::NotFound(format!(
                        "author of status update {}",
                        self.id
                    )))
                }
            }
        }
    }

    fn order_key(&self) -> (DateTime<Utc>, u64) {
        (self.date, self.sequence)
    }
}

fn missing(id: NodeId, key: &str) -> SocialError {
    SocialError::NotFound(format!("property '{}' on status update {}", key, id))
}

/// Lazy walk over one person's updates, newest first
///
/// Each step reads one node from the unit of work. After an error the chain
/// yields nothing more.
pub struct StatusChain<'t, T: Transaction + ?Sized> {
    tx: &'t T,
    next: Option<NodeId>,
}

impl<'t, T: Transaction + ?Sized> StatusChain<'t, T> {
    pub(crate) fn new(tx: &'t T, head: Option<NodeId>) -> Self {
        StatusChain { tx, next: head }
    }

    fn step(&mut self, id: NodeId) -> SocialResult<StatusUpdate> {
        let update = StatusUpdate::load(self.tx, id)?;
        self.next = self
            .tx
            .adjacency(id, &schema::next(), Direction::Outgoing)?
            .first()
            .copied();
        Ok(update)
    }
}

impl<'t, T: Transaction + ?Sized> Iterator for StatusChain<'t, T> {
    type Item = SocialResult<StatusUpdate>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        Some(self.step(id))
    }
}

/// Current head of one chain inside the merge heap
struct FeedHead {
    update: StatusUpdate,
    source: usize,
}

impl PartialEq for FeedHead {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FeedHead {}

impl Ord for FeedHead {
    // Max-heap: the most recent update surfaces first
    fn cmp(&self, other: &Self) -> Ordering {
        self.update
            .order_key()
            .cmp(&other.update.order_key())
            .then_with(|| other.source.cmp(&self.source))
    }
}

impl PartialOrd for FeedHead {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Updates of several people merged into one sequence, most recent first
pub struct StatusFeed<'t, T: Transaction + ?Sized> {
    chains: Vec<StatusChain<'t, T>>,
    heads: BinaryHeap<FeedHead>,
    deferred: Option<SocialError>,
}

impl<'t, T: Transaction + ?Sized> StatusFeed<'t, T> {
    /// Merge already-sorted chains
    pub fn merge(chains: Vec<StatusChain<'t, T>>) -> SocialResult<Self> {
        let mut feed = StatusFeed {
            heads: BinaryHeap::with_capacity(chains.len()),
            chains,
            deferred: None,
        };
        for source in 0..feed.chains.len() {
            if let Some(first) = feed.chains[source].next() {
                feed.heads.push(FeedHead {
                    update: first?,
                    source,
                });
            }
        }
        Ok(feed)
    }

    /// Feed over the updates of `people`
    pub fn for_people(tx: &'t T, people: &[Person]) -> SocialResult<Self> {
        let chains = people
            .iter()
            .map(|person| person.get_status(tx))
            .collect::<SocialResult<Vec<_>>>()?;
        Self::merge(chains)
    }
}

impl<'t, T: Transaction + ?Sized> Iterator for StatusFeed<'t, T> {
    type Item = SocialResult<StatusUpdate>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.deferred.take() {
            self.heads.clear();
            return Some(Err(err));
        }
        let head = self.heads.pop()?;
        match self.chains[head.source].next() {
            Some(Ok(update)) => self.heads.push(FeedHead {
                update,
                source: head.source,
            }),
            Some(Err(err)) => self.deferred = Some(err),
            None => {}
        }
        Some(Ok(head.update))
    }
}
