//! Database store wrapper.
//!
//! One `Store` owns one native_db database and is the single mutable
//! context for it: all reads and writes for a given store go through this
//! handle, and distinct stores share nothing. Opening a file-backed store
//! runs the migration plan to completion before the handle is returned.

use crate::error::{Error, Result};
use crate::migrations::{MigrationContext, MigrationPlan};
use crate::mock::{self, SampleRng};
use crate::queries;
use crate::schema::meta::StoredMeta;
use crate::schema::v1::StoredMovieV1;
use crate::schema::v2::StoredMovieV2;
use crate::schema::v3::StoredMovieV3;
use crate::schema::v4::{StoredActorV4, StoredActorV4Key, StoredMovieV4};
use crate::schema::{SchemaVersion, StoredActor, StoredMovie, ACTIVE};
use marquee_core::{sortable_title, ActorId, Movie, MovieId};
use native_db::transaction::RwTransaction;
use native_db::*;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, PoisonError};

// Every model shape the store has ever persisted; older versions stay
// registered so their rows remain readable during migration.
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<StoredMeta>().unwrap();
    models.define::<StoredMovieV1>().unwrap();
    models.define::<StoredMovieV2>().unwrap();
    models.define::<StoredMovieV3>().unwrap();
    models.define::<StoredMovieV4>().unwrap();
    models.define::<StoredActorV4>().unwrap();
    models
});

#[cfg(test)]
pub(crate) fn models() -> &'static Models {
    &MODELS
}

/// Read the on-disk schema version tag, if one has been written.
pub(crate) fn read_version(db: &Database<'static>) -> Result<Option<SchemaVersion>> {
    let r = db.r_transaction()?;
    let stored: Option<StoredMeta> = r.get().primary(StoredMeta::KEY.to_string())?;
    Ok(stored.map(|meta| meta.to_version()))
}

/// Durably advance the schema version tag.
pub(crate) fn write_version(db: &Database<'static>, version: SchemaVersion) -> Result<()> {
    let rw = db.rw_transaction()?;
    rw.upsert(StoredMeta::from_version(version))?;
    rw.commit()?;
    Ok(())
}

/// Persistent store for the movie library.
pub struct Store {
    pub(crate) db: Database<'static>,
    path: Option<PathBuf>,
    pending_deletes: Mutex<Vec<MovieId>>,
    sampler: Mutex<SampleRng>,
}

impl Store {
    /// Open or create a file-backed store, migrating it to the active
    /// schema before returning.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let db = Builder::new().create(&MODELS, &path)?;
        let plan = MigrationPlan::standard();
        plan.validate()?;
        let on_disk = read_version(&db)
            .map_err(|e| Error::Open(format!("unreadable schema version tag: {e}")))?;
        match on_disk {
            // Fresh store: created directly at the active schema.
            None => write_version(&db, ACTIVE)?,
            Some(found) => {
                let ctx = MigrationContext::new(&db, &path);
                plan.run(&ctx, found)?;
            }
        }
        Ok(Self::from_db(db, Some(path)))
    }

    /// Create an empty in-memory store at the active schema. No migration
    /// runs; intended for tests.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new().create_in_memory(&MODELS)?;
        write_version(&db, ACTIVE)?;
        Ok(Self::from_db(db, None))
    }

    /// Create an in-memory store pre-seeded with one sample movie.
    pub fn preview() -> Result<Self> {
        let store = Self::in_memory()?;
        let entry = &mock::CATALOG[0];
        store.insert_movie(entry.title, entry.cast)?;
        Ok(store)
    }

    fn from_db(db: Database<'static>, path: Option<PathBuf>) -> Self {
        Self {
            db,
            path,
            pending_deletes: Mutex::new(Vec::new()),
            sampler: Mutex::new(SampleRng::from_entropy()),
        }
    }

    /// Path of the backing file, if this store is file-backed.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The store's current schema version.
    pub fn schema_version(&self) -> Result<SchemaVersion> {
        read_version(&self.db)?
            .ok_or_else(|| Error::Open("store has no schema version tag".to_string()))
    }

    /// Insert a movie with its cast, find-or-creating actors by name and
    /// linking both relationship directions.
    pub(crate) fn insert_movie(&self, title: &str, cast: &[&str]) -> Result<Movie> {
        let movie_id = MovieId::generate();
        let movie_key = movie_id.to_string();
        {
            let rw = self.db.rw_transaction()?;
            let mut actor_ids: Vec<String> = Vec::new();
            for name in cast {
                let mut actor = find_or_make_actor(&rw, name)?;
                if !actor.movie_ids.contains(&movie_key) {
                    actor.movie_ids.push(movie_key.clone());
                }
                if !actor_ids.contains(&actor.id) {
                    actor_ids.push(actor.id.clone());
                }
                rw.upsert(actor)?;
            }
            rw.insert(StoredMovie {
                id: movie_key.clone(),
                title: title.to_string(),
                favorite: false,
                sortable_title: sortable_title(title),
                actor_ids,
            })?;
            rw.commit()?;
        }
        self.movie(movie_id)
    }

    /// Flip a movie's favorite flag and return the fresh snapshot.
    pub(crate) fn toggle_favorite(&self, id: MovieId) -> Result<Movie> {
        {
            let rw = self.db.rw_transaction()?;
            let stored: Option<StoredMovie> = rw.get().primary(id.to_string())?;
            let mut movie = stored.ok_or_else(|| Error::NotFound(format!("movie {id}")))?;
            movie.favorite = !movie.favorite;
            rw.upsert(movie)?;
            rw.commit()?;
        }
        self.movie(id)
    }

    /// Resolve a movie id back to a snapshot within this store.
    pub(crate) fn movie(&self, id: MovieId) -> Result<Movie> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredMovie> = r.get().primary(id.to_string())?;
        let stored = stored.ok_or_else(|| Error::NotFound(format!("movie {id}")))?;
        queries::snapshot_movie(&r, &stored)
    }

    /// Stage a movie for removal on the next `save`.
    pub(crate) fn stage_delete(&self, id: MovieId) {
        let mut pending = self
            .pending_deletes
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !pending.contains(&id) {
            pending.push(id);
        }
    }

    /// Apply staged removals in one transaction, unlinking both directions
    /// of the relationship. Staged entries are kept on failure so a retry
    /// can still apply them.
    pub(crate) fn save(&self) -> Result<()> {
        let staged: Vec<MovieId> = self
            .pending_deletes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if staged.is_empty() {
            return Ok(());
        }

        let rw = self.db.rw_transaction()?;
        for id in &staged {
            let stored: Option<StoredMovie> = rw.get().primary(id.to_string())?;
            let Some(movie) = stored else {
                continue;
            };
            for actor_key in &movie.actor_ids {
                let stored_actor: Option<StoredActor> = rw.get().primary(actor_key.clone())?;
                if let Some(mut actor) = stored_actor {
                    actor.movie_ids.retain(|m| m != &movie.id);
                    rw.upsert(actor)?;
                }
            }
            rw.remove(movie)?;
        }
        rw.commit()?;

        self.pending_deletes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|id| !staged.contains(id));
        Ok(())
    }

    /// Pick a sample catalog entry for `add`.
    pub(crate) fn sample_entry(&self) -> &'static mock::MockMovie {
        let mut rng = self.sampler.lock().unwrap_or_else(PoisonError::into_inner);
        let index = rng.pick_index(mock::CATALOG.len());
        &mock::CATALOG[index]
    }

    /// Raw database access for migration tests that seed old-version rows.
    #[cfg(test)]
    pub(crate) fn open_unmigrated(path: &Path) -> Result<Database<'static>> {
        Ok(Builder::new().create(&MODELS, path)?)
    }
}

/// Find an actor by exact name within the transaction, or make a fresh
/// unsaved record for it.
fn find_or_make_actor(rw: &RwTransaction, name: &str) -> Result<StoredActor> {
    let candidates: Vec<StoredActor> = {
        let scan = rw.scan().secondary::<StoredActor>(StoredActorV4Key::name)?;
        let iter = scan.start_with(name)?;
        iter.collect::<std::result::Result<Vec<_>, _>>()?
    };
    if let Some(actor) = candidates.into_iter().find(|actor| actor.name == name) {
        return Ok(actor);
    }
    Ok(StoredActor {
        id: ActorId::generate().to_string(),
        name: name.to_string(),
        movie_ids: Vec::new(),
    })
}
