//! Migration stage variants and the context handed to stage code.

use crate::error::Result;
use crate::schema::SchemaVersion;
use native_db::Database;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// A function run against the store during a stage.
///
/// Hooks and structural maps share this shape; each opens and commits its
/// own transactions against the context's database handle.
pub type Hook = fn(&MigrationContext) -> Result<()>;

/// Borrowed store state available to migration code.
pub struct MigrationContext<'a> {
    pub(crate) db: &'a Database<'static>,
    store_path: PathBuf,
}

impl<'a> MigrationContext<'a> {
    pub(crate) fn new(db: &'a Database<'static>, store_path: &Path) -> Self {
        Self {
            db,
            store_path: store_path.to_path_buf(),
        }
    }

    /// Path of a stage's transfer side-channel file.
    ///
    /// Derived from the store path; distinct stores never share a
    /// side-channel.
    pub(crate) fn transfer_path(&self, tag: &str) -> PathBuf {
        let mut name = self
            .store_path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("store"));
        name.push(format!(".{tag}.json"));
        self.store_path.with_file_name(name)
    }
}

/// The transition rule between two adjacent schema versions.
pub enum MigrationStage {
    /// Pure structural mapping: added fields take declared defaults,
    /// removed fields are dropped. No external I/O.
    Lightweight {
        from: SchemaVersion,
        to: SchemaVersion,
        migrate: Hook,
    },
    /// Structural mapping bracketed by hooks. The pre-hook runs against
    /// the old-version rows, the post-hook against the new-version rows.
    Custom {
        from: SchemaVersion,
        to: SchemaVersion,
        will_migrate: Option<Hook>,
        migrate: Hook,
        did_migrate: Option<Hook>,
    },
}

impl MigrationStage {
    /// Create a lightweight stage.
    pub fn lightweight(from: SchemaVersion, to: SchemaVersion, migrate: Hook) -> Self {
        Self::Lightweight { from, to, migrate }
    }

    /// Create a custom stage.
    pub fn custom(
        from: SchemaVersion,
        to: SchemaVersion,
        will_migrate: Option<Hook>,
        migrate: Hook,
        did_migrate: Option<Hook>,
    ) -> Self {
        Self::Custom {
            from,
            to,
            will_migrate,
            migrate,
            did_migrate,
        }
    }

    /// Version this stage migrates from.
    pub fn from_version(&self) -> SchemaVersion {
        match self {
            Self::Lightweight { from, .. } | Self::Custom { from, .. } => *from,
        }
    }

    /// Version this stage migrates to.
    pub fn to_version(&self) -> SchemaVersion {
        match self {
            Self::Lightweight { to, .. } | Self::Custom { to, .. } => *to,
        }
    }

    /// Run the stage to completion.
    pub(crate) fn apply(&self, ctx: &MigrationContext) -> Result<()> {
        match self {
            Self::Lightweight { migrate, .. } => migrate(ctx),
            Self::Custom {
                will_migrate,
                migrate,
                did_migrate,
                ..
            } => {
                if let Some(hook) = will_migrate {
                    hook(ctx)?;
                }
                migrate(ctx)?;
                if let Some(hook) = did_migrate {
                    hook(ctx)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{V1, V2};

    fn noop(_ctx: &MigrationContext) -> Result<()> {
        Ok(())
    }

    #[test]
    fn test_stage_versions() {
        let stage = MigrationStage::lightweight(V1, V2, noop);
        assert_eq!(stage.from_version(), V1);
        assert_eq!(stage.to_version(), V2);

        let stage = MigrationStage::custom(V1, V2, None, noop, Some(noop));
        assert_eq!(stage.from_version(), V1);
        assert_eq!(stage.to_version(), V2);
    }

    #[test]
    fn test_transfer_path_sits_next_to_store() {
        let db = native_db::Builder::new()
            .create_in_memory(crate::store::models())
            .unwrap();
        let ctx = MigrationContext::new(&db, Path::new("/data/library.marquee"));
        let path = ctx.transfer_path("relational-rewrite");
        assert_eq!(
            path,
            PathBuf::from("/data/library.marquee.relational-rewrite.json")
        );
    }
}
