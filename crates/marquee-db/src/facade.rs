//! Narrow CRUD+fetch surface consumed by callers.
//!
//! `MovieDb` is the only type the action layer sees: it hands out value
//! snapshots, never live rows, and holds nothing beyond a shared handle to
//! one store. Handles are injected explicitly - production, test, and
//! preview stores are just different `Store` instances, never a
//! process-wide singleton.

use crate::error::Result;
use crate::query::{ActorQuery, MovieQuery};
use crate::store::Store;
use marquee_core::{Actor, Movie};
use std::sync::Arc;

/// Database facade over one store context.
#[derive(Clone)]
pub struct MovieDb {
    store: Arc<Store>,
}

impl MovieDb {
    /// Wrap an existing store handle.
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Open a file-backed store and wrap it.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Ok(Self::new(Arc::new(Store::open(path)?)))
    }

    /// Empty in-memory store, for tests.
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(Arc::new(Store::in_memory()?)))
    }

    /// Seeded in-memory store, for previews.
    pub fn preview() -> Result<Self> {
        Ok(Self::new(Arc::new(Store::preview()?)))
    }

    /// The underlying store handle.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Fetch movie snapshots. Never raises: an underlying failure
    /// degrades to an empty result.
    pub fn fetch_movies(&self, query: &MovieQuery) -> Vec<Movie> {
        self.store.fetch_movies(query).unwrap_or_default()
    }

    /// Fetch actor snapshots. Never raises.
    pub fn fetch_actors(&self, query: &ActorQuery) -> Vec<Actor> {
        self.store.fetch_actors(query).unwrap_or_default()
    }

    /// Insert one generated sample movie with its cast.
    pub fn add(&self) -> Result<()> {
        let entry = self.store.sample_entry();
        self.store.insert_movie(entry.title, entry.cast)?;
        Ok(())
    }

    /// Flip a movie's favorite flag and return the fresh snapshot.
    pub fn toggle_favorite(&self, movie: &Movie) -> Result<Movie> {
        self.store.toggle_favorite(movie.id)
    }

    /// Stage a removal; it takes effect on the next `save`.
    pub fn delete(&self, movie: &Movie) {
        self.store.stage_delete(movie.id);
    }

    /// Persist staged removals. Failures are surfaced, not discarded.
    pub fn save(&self) -> Result<()> {
        self.store.save()
    }
}
