//! V2 -> V3: custom stage introducing the precomputed sort key.
//!
//! The structural map carries rows across with an empty key; the post-hook
//! then computes `sortable_title` from each title. Re-running the hook is
//! harmless, which keeps a crash between the map and the version bump
//! recoverable on the next open.

use crate::error::Result;
use crate::migrations::stage::{MigrationContext, MigrationStage};
use crate::schema::v2::StoredMovieV2;
use crate::schema::v3::StoredMovieV3;
use crate::schema::{V2, V3};
use marquee_core::sortable_title;

pub(crate) fn stage() -> MigrationStage {
    MigrationStage::custom(V2, V3, None, migrate, Some(populate_sort_keys))
}

fn migrate(ctx: &MigrationContext) -> Result<()> {
    let rw = ctx.db.rw_transaction()?;
    let movies: Vec<StoredMovieV2> = {
        let scan = rw.scan().primary::<StoredMovieV2>()?;
        let iter = scan.all()?;
        iter.collect::<std::result::Result<Vec<_>, _>>()?
    };
    for movie in movies {
        rw.insert(StoredMovieV3 {
            id: movie.id.clone(),
            title: movie.title.clone(),
            cast: movie.cast.clone(),
            favorite: movie.favorite,
            sortable_title: String::new(),
        })?;
        rw.remove(movie)?;
    }
    rw.commit()?;
    Ok(())
}

fn populate_sort_keys(ctx: &MigrationContext) -> Result<()> {
    let rw = ctx.db.rw_transaction()?;
    let movies: Vec<StoredMovieV3> = {
        let scan = rw.scan().primary::<StoredMovieV3>()?;
        let iter = scan.all()?;
        iter.collect::<std::result::Result<Vec<_>, _>>()?
    };
    for mut movie in movies {
        movie.sortable_title = sortable_title(&movie.title);
        rw.upsert(movie)?;
    }
    rw.commit()?;
    Ok(())
}
