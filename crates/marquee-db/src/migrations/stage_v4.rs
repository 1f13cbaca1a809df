//! V3 -> V4: custom stage performing the relational rewrite.
//!
//! Inlined cast lists become actor records linked many-to-many. Live rows
//! cannot cross the schema swap, so the pre-hook snapshots every movie
//! into the transfer file and deletes the old rows; the post-hook rebuilds
//! movies with their original ids and find-or-creates one actor per
//! distinct name. Movie identity is preserved bit-for-bit; actor identity
//! is not - actors are recreated and deduplicated by exact name equality.

use crate::error::Result;
use crate::migrations::stage::{MigrationContext, MigrationStage};
use crate::migrations::transfer::{self, TransferRecord};
use crate::schema::v3::StoredMovieV3;
use crate::schema::{StoredActor, StoredMovie, V3, V4};
use indexmap::IndexMap;
use marquee_core::{sortable_title, ActorId};

const TRANSFER_TAG: &str = "relational-rewrite";

pub(crate) fn stage() -> MigrationStage {
    MigrationStage::custom(V3, V4, Some(export_movies), migrate, Some(import_movies))
}

/// Pre-hook: snapshot every movie to the transfer file, then delete them.
///
/// The write must complete before any row is deleted; an export failure
/// aborts the stage with the old data intact.
fn export_movies(ctx: &MigrationContext) -> Result<()> {
    let rw = ctx.db.rw_transaction()?;
    let movies: Vec<StoredMovieV3> = {
        let scan = rw.scan().primary::<StoredMovieV3>()?;
        let iter = scan.all()?;
        iter.collect::<std::result::Result<Vec<_>, _>>()?
    };
    let records: Vec<TransferRecord> = movies
        .iter()
        .map(|movie| TransferRecord {
            id: movie.id.clone(),
            title: movie.title.clone(),
            actors: movie.cast.clone(),
            favorite: movie.favorite,
        })
        .collect();
    transfer::write_records(&ctx.transfer_path(TRANSFER_TAG), &records)?;

    for movie in movies {
        rw.remove(movie)?;
    }
    rw.commit()?;
    Ok(())
}

/// Structural map for rows still present after the export.
///
/// The pre-hook empties the V3 table, so this is normally a no-op, but the
/// swap is defined for every row regardless: cast is dropped, the
/// relationship starts empty.
fn migrate(ctx: &MigrationContext) -> Result<()> {
    let rw = ctx.db.rw_transaction()?;
    let movies: Vec<StoredMovieV3> = {
        let scan = rw.scan().primary::<StoredMovieV3>()?;
        let iter = scan.all()?;
        iter.collect::<std::result::Result<Vec<_>, _>>()?
    };
    for movie in movies {
        rw.insert(StoredMovie {
            id: movie.id.clone(),
            title: movie.title.clone(),
            favorite: movie.favorite,
            sortable_title: movie.sortable_title.clone(),
            actor_ids: Vec::new(),
        })?;
        rw.remove(movie)?;
    }
    rw.commit()?;
    Ok(())
}

/// Post-hook: rebuild movies and actors from the transfer file.
///
/// An absent file means nothing to migrate - the guard for re-entrant
/// opens. Everything is inserted in a single transaction committed once
/// after the last record.
fn import_movies(ctx: &MigrationContext) -> Result<()> {
    let path = ctx.transfer_path(TRANSFER_TAG);
    let Some(records) = transfer::read_records(&path)? else {
        return Ok(());
    };
    transfer::remove_file(&path)?;

    let rw = ctx.db.rw_transaction()?;
    // Name -> actor index, so reimport stays linear in the record count.
    let mut actors_by_name: IndexMap<String, StoredActor> = IndexMap::new();
    for record in &records {
        let mut actor_ids = Vec::new();
        for name in &record.actors {
            let actor = actors_by_name
                .entry(name.clone())
                .or_insert_with(|| StoredActor {
                    id: ActorId::generate().to_string(),
                    name: name.clone(),
                    movie_ids: Vec::new(),
                });
            if !actor.movie_ids.contains(&record.id) {
                actor.movie_ids.push(record.id.clone());
            }
            if !actor_ids.contains(&actor.id) {
                actor_ids.push(actor.id.clone());
            }
        }
        rw.insert(StoredMovie {
            id: record.id.clone(),
            title: record.title.clone(),
            favorite: record.favorite,
            sortable_title: sortable_title(&record.title),
            actor_ids,
        })?;
    }
    for (_, actor) in actors_by_name {
        rw.insert(actor)?;
    }
    rw.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store;
    use marquee_core::MovieId;
    use native_db::{Builder, Database};

    fn v3_db_with(movies: &[(&str, &[&str])]) -> (Database<'static>, Vec<String>) {
        let db = Builder::new().create_in_memory(store::models()).unwrap();
        let mut ids = Vec::new();
        let rw = db.rw_transaction().unwrap();
        for (title, cast) in movies {
            let id = MovieId::generate().to_string();
            rw.insert(StoredMovieV3 {
                id: id.clone(),
                title: title.to_string(),
                cast: cast.iter().map(|name| name.to_string()).collect(),
                favorite: false,
                sortable_title: marquee_core::sortable_title(title),
            })
            .unwrap();
            ids.push(id);
        }
        rw.commit().unwrap();
        (db, ids)
    }

    fn count_movies(db: &Database<'static>) -> usize {
        let r = db.r_transaction().unwrap();
        let scan = r.scan().primary::<StoredMovie>().unwrap();
        scan.all().unwrap().count()
    }

    fn count_v3_movies(db: &Database<'static>) -> usize {
        let r = db.r_transaction().unwrap();
        let scan = r.scan().primary::<StoredMovieV3>().unwrap();
        scan.all().unwrap().count()
    }

    #[test]
    fn test_rewrite_preserves_movies_and_dedupes_actors() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("library.marquee");
        let (db, ids) = v3_db_with(&[
            ("Se7en", &["Brad Pitt", "Morgan Freeman"]),
            (
                "The Score",
                &["Robert De Niro", "Marlon Brando", "Edward Norton"],
            ),
        ]);
        let ctx = MigrationContext::new(&db, &store_path);

        export_movies(&ctx).unwrap();
        assert_eq!(count_v3_movies(&db), 0);
        assert!(ctx.transfer_path(TRANSFER_TAG).exists());

        migrate(&ctx).unwrap();
        import_movies(&ctx).unwrap();
        assert!(!ctx.transfer_path(TRANSFER_TAG).exists());
        assert_eq!(count_movies(&db), 2);

        let r = db.r_transaction().unwrap();
        let actors: Vec<StoredActor> = {
            let scan = r.scan().primary::<StoredActor>().unwrap();
            scan.all().unwrap().collect::<std::result::Result<Vec<_>, _>>().unwrap()
        };
        assert_eq!(actors.len(), 5);

        // Ids survive; both directions of every link are present.
        for id in &ids {
            let movie: Option<StoredMovie> = r.get().primary(id.clone()).unwrap();
            let movie = movie.unwrap();
            for actor_id in &movie.actor_ids {
                let actor = actors.iter().find(|a| &a.id == actor_id).unwrap();
                assert!(actor.movie_ids.contains(&movie.id));
            }
        }
        for actor in &actors {
            assert!(!actor.movie_ids.is_empty());
            for movie_id in &actor.movie_ids {
                let movie: Option<StoredMovie> = r.get().primary(movie_id.clone()).unwrap();
                assert!(movie.unwrap().actor_ids.contains(&actor.id));
            }
        }
    }

    #[test]
    fn test_import_with_absent_file_is_nothing_to_migrate() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("library.marquee");
        let (db, _) = v3_db_with(&[]);
        let ctx = MigrationContext::new(&db, &store_path);
        import_movies(&ctx).unwrap();
        assert_eq!(count_movies(&db), 0);
    }

    #[test]
    fn test_export_overwrites_stale_transfer_file() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("library.marquee");
        let (db, _) = v3_db_with(&[("Heat", &["Al Pacino"])]);
        let ctx = MigrationContext::new(&db, &store_path);
        std::fs::write(ctx.transfer_path(TRANSFER_TAG), b"stale junk").unwrap();

        export_movies(&ctx).unwrap();
        let records = transfer::read_records(&ctx.transfer_path(TRANSFER_TAG))
            .unwrap()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Heat");
    }

    #[test]
    fn test_repeated_cast_name_links_once() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("library.marquee");
        let (db, _) = v3_db_with(&[("Adaptation", &["Nicolas Cage", "Nicolas Cage"])]);
        let ctx = MigrationContext::new(&db, &store_path);
        export_movies(&ctx).unwrap();
        migrate(&ctx).unwrap();
        import_movies(&ctx).unwrap();

        let r = db.r_transaction().unwrap();
        let actors: Vec<StoredActor> = {
            let scan = r.scan().primary::<StoredActor>().unwrap();
            scan.all().unwrap().collect::<std::result::Result<Vec<_>, _>>().unwrap()
        };
        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].movie_ids.len(), 1);
    }
}
