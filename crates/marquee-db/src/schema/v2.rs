//! Schema V2 - adds the favorite flag.
//!
//! Reached from V1 by a lightweight stage; `favorite` defaults to false.

use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored movie with a favorite flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 2, version = 1)]
#[native_db]
pub struct StoredMovieV2 {
    /// Primary key - movie UUID in string form.
    #[primary_key]
    pub id: String,
    pub title: String,
    pub cast: Vec<String>,
    pub favorite: bool,
}
