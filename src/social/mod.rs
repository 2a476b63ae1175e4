//! Social network engine
//!
//! People, friendships and status updates stored as a property graph, plus
//! the queries run over it: friends-of-friends, status feeds, bounded
//! shortest paths and friend recommendations.
//!
//! All operations take the caller's unit of work; only [`commit`] ends one.

pub mod error;
pub mod path;
pub mod person;
pub mod recommend;
pub mod repository;
pub mod schema;
pub mod status;

pub use error::{commit, SocialError, SocialResult};
pub use path::{shortest_path, PathFinder};
pub use person::{People, Person};
pub use recommend::{recommend, Recommendation, RecommendationEngine};
pub use repository::PersonRepository;
pub use status::{StatusChain, StatusFeed, StatusUpdate};
