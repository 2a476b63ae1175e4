//! Error taxonomy of the social engine

use crate::graph::{StoreError, Transaction};
use thiserror::Error;

/// Errors surfaced by person, feed, path and recommendation operations
///
/// Nothing here is retried by the engine; a `ConcurrentModification` means the
/// caller's unit of work lost a write race and may be re-run from scratch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SocialError {
    #[error("Person already exists: {0}")]
    DuplicateName(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Concurrent modification detected on {0}")]
    ConcurrentModification(String),

    #[error("Graph store error: {0}")]
    Store(#[source] StoreError),
}

impl From<StoreError> for SocialError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(what) => SocialError::ConcurrentModification(what),
            StoreError::NodeNotFound(id) | StoreError::InvalidEdgeEndpoint(id) => {
                SocialError::NotFound(format!("node {}", id))
            }
            other => SocialError::Store(other),
        }
    }
}

pub type SocialResult<T> = Result<T, SocialError>;

/// Commit a unit of work, reporting a lost write race as `ConcurrentModification`
pub fn commit<T: Transaction>(tx: T) -> SocialResult<()> {
    tx.commit()?;
    Ok(())
}
