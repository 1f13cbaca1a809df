//! Schema V1 - movies only, cast inlined as a list of names.

use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored movie, first shipped shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredMovieV1 {
    /// Primary key - movie UUID in string form.
    #[primary_key]
    pub id: String,
    pub title: String,
    /// Cast member names, in billing order.
    pub cast: Vec<String>,
}
