//! Immutable value snapshots returned by fetches
//!
//! The storage layer never hands out live rows. A fetch assembles these
//! values, with the movie/actor relationship eagerly resolved into
//! `NamedId` entries: enough to display a related record and to resolve it
//! back to a full snapshot later.

use crate::{ActorId, MovieId};
use serde::{Deserialize, Serialize};

/// A resolvable reference to a related record, with its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedId<T> {
    /// Identifier to resolve against the same store
    pub id: T,
    /// Display name captured at fetch time
    pub name: String,
}

impl<T> NamedId<T> {
    /// Create a new named reference
    pub fn new(id: T, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Snapshot of a movie and its cast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// Stable identity, preserved across schema rewrites
    pub id: MovieId,
    /// Display title
    pub title: String,
    /// Favorite flag
    pub favorite: bool,
    /// Precomputed normalized sort key
    pub sortable_title: String,
    /// Cast members, ordered by name
    pub actors: Vec<NamedId<ActorId>>,
}

/// Snapshot of an actor and the movies they appear in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Identity within the current schema generation
    pub id: ActorId,
    /// Actor name, unique within the store
    pub name: String,
    /// Appearances, ordered by the movies' sort keys
    pub movies: Vec<NamedId<MovieId>>,
}
