//! JSON seed files: people, friendships and status updates to load at startup
//!
//! ```json
//! {
//!   "persons": ["alice", "bob"],
//!   "friendships": [["alice", "bob"]],
//!   "statuses": [{ "person": "bob", "text": "hello", "date": "2024-05-01T10:00:00Z" }]
//! }
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use socnet::graph::{GraphStore, MemoryGraph};
use socnet::social::{self, PersonRepository};
use std::path::Path;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub persons: Vec<String>,
    pub friendships: Vec<(String, String)>,
    pub statuses: Vec<SeedStatus>,
}

#[derive(Debug, Deserialize)]
pub struct SeedStatus {
    pub person: String,
    pub text: String,
    /// Defaults to the load time
    pub date: Option<DateTime<Utc>>,
}

impl Seed {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading seed file {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("parsing seed file {}", path.display()))
    }

    /// Write the seed into `graph` in a single unit of work
    pub fn load_into(&self, graph: &MemoryGraph, repo: &PersonRepository) -> Result<()> {
        let mut tx = graph.begin()?;

        for name in &self.persons {
            repo.create_person(&mut tx, name)
                .with_context(|| format!("creating person '{}'", name))?;
        }
        for (a, b) in &self.friendships {
            let a = repo.get_person_by_name(&tx, a)?;
            let b = repo.get_person_by_name(&tx, b)?;
            a.add_friend(&mut tx, &b)?;
        }
        for status in &self.statuses {
            let person = repo.get_person_by_name(&tx, &status.person)?;
            match status.date {
                Some(date) => person.add_status_at(&mut tx, &status.text, date)?,
                None => person.add_status(&mut tx, &status.text)?,
            };
        }

        social::commit(tx)?;
        info!(
            "Loaded seed: {} person(s), {} friendship(s), {} status update(s)",
            self.persons.len(),
            self.friendships.len(),
            self.statuses.len()
        );
        Ok(())
    }
}
