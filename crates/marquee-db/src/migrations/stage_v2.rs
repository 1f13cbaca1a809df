//! V1 -> V2: lightweight stage adding the favorite flag.

use crate::error::Result;
use crate::migrations::stage::MigrationContext;
use crate::schema::v1::StoredMovieV1;
use crate::schema::v2::StoredMovieV2;

/// Map every V1 movie to its V2 shape. Added `favorite` defaults to false.
pub(crate) fn migrate(ctx: &MigrationContext) -> Result<()> {
    let rw = ctx.db.rw_transaction()?;
    let movies: Vec<StoredMovieV1> = {
        let scan = rw.scan().primary::<StoredMovieV1>()?;
        let iter = scan.all()?;
        iter.collect::<std::result::Result<Vec<_>, _>>()?
    };
    for movie in movies {
        rw.insert(StoredMovieV2 {
            id: movie.id.clone(),
            title: movie.title.clone(),
            cast: movie.cast.clone(),
            favorite: false,
        })?;
        rw.remove(movie)?;
    }
    rw.commit()?;
    Ok(())
}
