//! Labels, relationship types and property keys of the social graph
//!
//! ```text
//! (Person)-[:FRIEND]-(Person)
//! (Person)-[:STATUS]->(StatusUpdate)-[:NEXT]->(StatusUpdate)-[:NEXT]->...
//! ```
//!
//! `STATUS` points at the newest update; `NEXT` links each update to the one
//! posted before it.

use crate::graph::{EdgeType, Label};

pub const PERSON: &str = "Person";
pub const STATUS_UPDATE: &str = "StatusUpdate";

pub const FRIEND: &str = "FRIEND";
pub const STATUS: &str = "STATUS";
pub const NEXT: &str = "NEXT";

pub const NAME: &str = "name";
pub const TEXT: &str = "text";
pub const DATE: &str = "date";
pub const SEQUENCE: &str = "seq";

pub fn person() -> Label {
    Label::new(PERSON)
}

pub fn status_update() -> Label {
    Label::new(STATUS_UPDATE)
}

pub fn friend() -> EdgeType {
    EdgeType::new(FRIEND)
}

pub fn status() -> EdgeType {
    EdgeType::new(STATUS)
}

pub fn next() -> EdgeType {
    EdgeType::new(NEXT)
}
