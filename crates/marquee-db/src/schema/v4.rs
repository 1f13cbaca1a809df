//! Schema V4 (active) - relational movies and actors.
//!
//! The inlined cast list is gone. Actors are records of their own, linked
//! to movies many-to-many. Both directions of the relationship are stored
//! explicitly and kept symmetric at every mutation site; nothing
//! synchronizes the inverse side automatically.

use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored movie, relational shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 4, version = 1)]
#[native_db]
pub struct StoredMovieV4 {
    /// Primary key - movie UUID in string form.
    #[primary_key]
    pub id: String,
    pub title: String,
    pub favorite: bool,
    /// Normalized sort key derived from `title`.
    pub sortable_title: String,
    /// Ids of the actors appearing in this movie.
    pub actor_ids: Vec<String>,
}

/// Stored actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 5, version = 1)]
#[native_db]
pub struct StoredActorV4 {
    /// Primary key - actor UUID in string form.
    #[primary_key]
    pub id: String,
    /// Actor name; unique within the store by construction.
    #[secondary_key]
    pub name: String,
    /// Ids of the movies this actor appears in.
    pub movie_ids: Vec<String>,
}
