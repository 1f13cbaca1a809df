//! Schema V3 - adds the precomputed normalized sort key.
//!
//! Reached from V2 by a custom stage whose post-hook fills in
//! `sortable_title` for every existing movie.

use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored movie with a sort key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 3, version = 1)]
#[native_db]
pub struct StoredMovieV3 {
    /// Primary key - movie UUID in string form.
    #[primary_key]
    pub id: String,
    pub title: String,
    pub cast: Vec<String>,
    pub favorite: bool,
    /// Normalized sort key derived from `title`.
    pub sortable_title: String,
}
