//! Marquee Core - Domain values for the marquee movie library
//!
//! This crate provides the storage-independent types shared by the
//! persistence layer and its callers:
//! - Stable identifiers for movies and actors (`MovieId`, `ActorId`)
//! - Immutable value snapshots (`Movie`, `Actor`, `NamedId`)
//! - Title normalization for sorting and searching (`sortable_title`,
//!   `search_key`, `contains_normalized`)
//! - The `TitleSort` ordering selector used by fetch queries
//!
//! Snapshots are plain values: fetching produces them once, and later
//! writes to the store never mutate a snapshot a caller already holds.

mod error;
mod identity;
mod snapshot;
pub mod title;

pub use error::{Error, Result};
pub use identity::{ActorId, MovieId};
pub use snapshot::{Actor, Movie, NamedId};
pub use title::{contains_normalized, search_key, sortable_title, TitleSort};
