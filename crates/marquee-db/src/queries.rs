//! Query execution against the store.
//!
//! Fetches read every row, filter and order in memory, and assemble
//! immutable snapshots with the relationship eagerly resolved. Linear
//! scans are fine at the expected scale (tens to low thousands of rows).

use crate::error::{Error, Result};
use crate::query::{ActorQuery, MovieQuery};
use crate::schema::{StoredActor, StoredMovie};
use crate::store::Store;
use marquee_core::{search_key, Actor, ActorId, Movie, MovieId, NamedId};
use native_db::transaction::RTransaction;

impl Store {
    /// Fetch movie snapshots matching a query.
    pub(crate) fn fetch_movies(&self, query: &MovieQuery) -> Result<Vec<Movie>> {
        let r = self.db.r_transaction()?;
        let rows: Vec<StoredMovie> = {
            let scan = r.scan().primary::<StoredMovie>()?;
            let iter = scan.all()?;
            iter.collect::<std::result::Result<Vec<_>, _>>()?
        };
        let mut movies = Vec::new();
        for row in rows.iter().filter(|row| query.matches(&row.title)) {
            movies.push(snapshot_movie(&r, row)?);
        }
        query.order(&mut movies);
        Ok(movies)
    }

    /// Fetch actor snapshots matching a query.
    pub(crate) fn fetch_actors(&self, query: &ActorQuery) -> Result<Vec<Actor>> {
        let r = self.db.r_transaction()?;
        let rows: Vec<StoredActor> = {
            let scan = r.scan().primary::<StoredActor>()?;
            let iter = scan.all()?;
            iter.collect::<std::result::Result<Vec<_>, _>>()?
        };
        let mut actors = Vec::new();
        for row in rows.iter().filter(|row| query.matches(&row.name)) {
            actors.push(snapshot_actor(&r, row)?);
        }
        query.order(&mut actors);
        Ok(actors)
    }
}

/// Assemble a movie snapshot, eagerly resolving its cast.
///
/// Every referenced actor must resolve within the same store; a dangling
/// reference is an invariant violation, not a recoverable miss.
pub(crate) fn snapshot_movie(r: &RTransaction, row: &StoredMovie) -> Result<Movie> {
    let id = MovieId::parse(&row.id)?;
    let mut actors = Vec::with_capacity(row.actor_ids.len());
    for actor_key in &row.actor_ids {
        let stored: Option<StoredActor> = r.get().primary(actor_key.clone())?;
        let stored = stored.ok_or_else(|| {
            Error::NotFound(format!("actor {actor_key} referenced by movie {id}"))
        })?;
        actors.push(NamedId::new(ActorId::parse(&stored.id)?, stored.name));
    }
    actors.sort_by(|a, b| search_key(&a.name).cmp(&search_key(&b.name)));
    Ok(Movie {
        id,
        title: row.title.clone(),
        favorite: row.favorite,
        sortable_title: row.sortable_title.clone(),
        actors,
    })
}

/// Assemble an actor snapshot, eagerly resolving their movies.
pub(crate) fn snapshot_actor(r: &RTransaction, row: &StoredActor) -> Result<Actor> {
    let id = ActorId::parse(&row.id)?;
    let mut movies = Vec::with_capacity(row.movie_ids.len());
    for movie_key in &row.movie_ids {
        let stored: Option<StoredMovie> = r.get().primary(movie_key.clone())?;
        let stored = stored.ok_or_else(|| {
            Error::NotFound(format!("movie {movie_key} referenced by actor {id}"))
        })?;
        movies.push((
            stored.sortable_title.clone(),
            NamedId::new(MovieId::parse(&stored.id)?, stored.title),
        ));
    }
    movies.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(Actor {
        id,
        name: row.name.clone(),
        movies: movies.into_iter().map(|(_, named)| named).collect(),
    })
}
