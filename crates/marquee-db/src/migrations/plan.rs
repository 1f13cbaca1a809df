//! Migration plan orchestration.
//!
//! The plan owns the ordered stage list and drives it at store-open time:
//! read the on-disk version, run every remaining stage in catalog order,
//! and advance the durable version tag after each one. A failed stage
//! aborts the open; there is no automatic rollback.

use crate::error::{Error, Result};
use crate::migrations::stage::{MigrationContext, MigrationStage};
use crate::migrations::{stage_v2, stage_v3, stage_v4};
use crate::schema::{SchemaVersion, ACTIVE, CATALOG, V1, V2};
use crate::store;

/// The ordered list of stages covering the schema catalog.
pub struct MigrationPlan {
    stages: Vec<MigrationStage>,
}

impl MigrationPlan {
    /// The shipping plan: every stage from the first schema to the active
    /// one.
    pub fn standard() -> Self {
        Self {
            stages: vec![
                MigrationStage::lightweight(V1, V2, stage_v2::migrate),
                stage_v3::stage(),
                stage_v4::stage(),
            ],
        }
    }

    /// Build a plan from explicit stages. Used by tests to exercise
    /// validation; production code uses [`MigrationPlan::standard`].
    pub fn from_stages(stages: Vec<MigrationStage>) -> Self {
        Self { stages }
    }

    /// Check that the stage list covers the catalog: every consecutive
    /// catalog pair has exactly one stage, in order, with no gaps or
    /// overlaps.
    pub fn validate(&self) -> Result<()> {
        if CATALOG.is_empty() {
            return Err(Error::Open("schema catalog is empty".to_string()));
        }
        for pair in CATALOG.windows(2) {
            if pair[0] >= pair[1] {
                return Err(Error::Open(format!(
                    "schema catalog is not strictly increasing at {}",
                    pair[1]
                )));
            }
        }
        if self.stages.len() != CATALOG.len() - 1 {
            return Err(Error::Open(format!(
                "{} stages cannot cover a catalog of {} versions",
                self.stages.len(),
                CATALOG.len()
            )));
        }
        for (stage, pair) in self.stages.iter().zip(CATALOG.windows(2)) {
            if stage.from_version() != pair[0] || stage.to_version() != pair[1] {
                return Err(Error::Open(format!(
                    "stage {} -> {} does not match catalog step {} -> {}",
                    stage.from_version(),
                    stage.to_version(),
                    pair[0],
                    pair[1]
                )));
            }
        }
        Ok(())
    }

    /// Run every stage whose `from` version is at or past the on-disk
    /// version, in order, advancing the stored version tag after each.
    ///
    /// Returns the version the store ends at. A store already at the
    /// active version runs zero stages.
    pub(crate) fn run(
        &self,
        ctx: &MigrationContext,
        on_disk: SchemaVersion,
    ) -> Result<SchemaVersion> {
        self.validate()?;
        if on_disk > ACTIVE {
            return Err(Error::Open(format!(
                "store version {on_disk} is newer than the newest known schema {ACTIVE}"
            )));
        }
        if !CATALOG.contains(&on_disk) {
            return Err(Error::Open(format!(
                "store version {on_disk} is not in the schema catalog"
            )));
        }

        let mut current = on_disk;
        for stage in &self.stages {
            if stage.from_version() < on_disk {
                continue;
            }
            stage.apply(ctx)?;
            current = stage.to_version();
            store::write_version(ctx.db, current)?;
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{ActorQuery, MovieQuery};
    use crate::schema::meta::StoredMeta;
    use crate::schema::v1::StoredMovieV1;
    use crate::schema::{V3, V4};
    use crate::store::Store;
    use marquee_core::{MovieId, TitleSort};
    use std::path::Path;

    fn noop(_ctx: &MigrationContext) -> Result<()> {
        Ok(())
    }

    fn seed_v1(path: &Path) -> (MovieId, MovieId) {
        let se7en = MovieId::generate();
        let score = MovieId::generate();
        let db = Store::open_unmigrated(path).unwrap();
        let rw = db.rw_transaction().unwrap();
        rw.insert(StoredMovieV1 {
            id: se7en.to_string(),
            title: "Se7en".to_string(),
            cast: vec!["Brad Pitt".to_string(), "Morgan Freeman".to_string()],
        })
        .unwrap();
        rw.insert(StoredMovieV1 {
            id: score.to_string(),
            title: "The Score".to_string(),
            cast: vec![
                "Robert De Niro".to_string(),
                "Marlon Brando".to_string(),
                "Edward Norton".to_string(),
            ],
        })
        .unwrap();
        rw.upsert(StoredMeta::from_version(V1)).unwrap();
        rw.commit().unwrap();
        (se7en, score)
    }

    #[test]
    fn test_standard_plan_is_valid() {
        assert!(MigrationPlan::standard().validate().is_ok());
    }

    #[test]
    fn test_short_plan_is_rejected() {
        let plan = MigrationPlan::from_stages(vec![MigrationStage::lightweight(V1, V2, noop)]);
        assert!(matches!(plan.validate(), Err(Error::Open(_))));
    }

    #[test]
    fn test_gapped_plan_is_rejected() {
        let plan = MigrationPlan::from_stages(vec![
            MigrationStage::lightweight(V1, V2, noop),
            MigrationStage::lightweight(V1, V2, noop),
            MigrationStage::lightweight(V3, V4, noop),
        ]);
        assert!(matches!(plan.validate(), Err(Error::Open(_))));
    }

    #[test]
    fn test_non_adjacent_stage_is_rejected() {
        let plan = MigrationPlan::from_stages(vec![
            MigrationStage::lightweight(V1, V3, noop),
            MigrationStage::lightweight(V3, V4, noop),
            MigrationStage::lightweight(V3, V4, noop),
        ]);
        assert!(matches!(plan.validate(), Err(Error::Open(_))));
    }

    #[test]
    fn test_full_chain_from_v1() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.marquee");
        let (se7en_id, score_id) = seed_v1(&path);

        let store = Store::open(&path).unwrap();
        assert_eq!(store.schema_version().unwrap(), ACTIVE);

        let movies = store.fetch_movies(&MovieQuery::new()).unwrap();
        assert_eq!(movies.len(), 2);

        let se7en = movies.iter().find(|m| m.title == "Se7en").unwrap();
        let score = movies.iter().find(|m| m.title == "The Score").unwrap();
        // Identity survives the rewrite; the flag picks up its default.
        assert_eq!(se7en.id, se7en_id);
        assert_eq!(score.id, score_id);
        assert!(!se7en.favorite);
        assert!(!score.favorite);
        assert_eq!(score.sortable_title, "score");
        assert_eq!(se7en.actors.len(), 2);
        assert_eq!(score.actors.len(), 3);

        let actors = store.fetch_actors(&ActorQuery::new()).unwrap();
        assert_eq!(actors.len(), 5);
        for actor in &actors {
            assert!(!actor.movies.is_empty(), "orphan actor {}", actor.name);
        }

        // The side-channel never survives a successful open.
        assert!(!path
            .with_file_name("library.marquee.relational-rewrite.json")
            .exists());
    }

    #[test]
    fn test_shared_actor_is_deduplicated_across_movies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.marquee");
        {
            let db = Store::open_unmigrated(&path).unwrap();
            let rw = db.rw_transaction().unwrap();
            for title in ["Se7en", "The Shawshank Redemption", "Bruce Almighty"] {
                rw.insert(StoredMovieV1 {
                    id: MovieId::generate().to_string(),
                    title: title.to_string(),
                    cast: vec!["Morgan Freeman".to_string()],
                })
                .unwrap();
            }
            rw.upsert(StoredMeta::from_version(V1)).unwrap();
            rw.commit().unwrap();
        }

        let store = Store::open(&path).unwrap();
        let actors = store.fetch_actors(&ActorQuery::new()).unwrap();
        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].name, "Morgan Freeman");
        assert_eq!(actors[0].movies.len(), 3);
    }

    #[test]
    fn test_reopen_runs_zero_stages_and_preserves_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.marquee");
        seed_v1(&path);

        let first = {
            let store = Store::open(&path).unwrap();
            store
                .fetch_movies(&MovieQuery::new().with_sort(Some(TitleSort::Ascending)))
                .unwrap()
        };
        let second = {
            let store = Store::open(&path).unwrap();
            assert_eq!(store.schema_version().unwrap(), ACTIVE);
            store
                .fetch_movies(&MovieQuery::new().with_sort(Some(TitleSort::Ascending)))
                .unwrap()
        };
        assert_eq!(first, second);
    }

    #[test]
    fn test_version_newer_than_catalog_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.marquee");
        {
            let db = Store::open_unmigrated(&path).unwrap();
            let rw = db.rw_transaction().unwrap();
            rw.upsert(StoredMeta::from_version(SchemaVersion::new(9, 0, 0)))
                .unwrap();
            rw.commit().unwrap();
        }
        assert!(matches!(Store::open(&path), Err(Error::Open(_))));
    }

    #[test]
    fn test_version_outside_catalog_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.marquee");
        {
            let db = Store::open_unmigrated(&path).unwrap();
            let rw = db.rw_transaction().unwrap();
            rw.upsert(StoredMeta::from_version(SchemaVersion::new(1, 5, 0)))
                .unwrap();
            rw.commit().unwrap();
        }
        assert!(matches!(Store::open(&path), Err(Error::Open(_))));
    }
}
