//! Transfer side-channel for structural rewrites.
//!
//! A custom stage that rewrites the schema cannot carry live rows across
//! the swap, so it snapshots them into flat records in a JSON file next to
//! the store. The file exists only between a stage's pre-hook and
//! post-hook; a fully successful open leaves nothing behind.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Schema-independent snapshot of one movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Movie UUID in string form; survives the rewrite bit-for-bit.
    pub id: String,
    pub title: String,
    /// Cast member names by value. Stored references would not survive
    /// the schema swap.
    pub actors: Vec<String>,
    pub favorite: bool,
}

/// Write the whole record set atomically, replacing any stale file.
pub(crate) fn write_records(path: &Path, records: &[TransferRecord]) -> Result<()> {
    let payload = serde_json::to_vec_pretty(records)
        .map_err(|e| Error::Transform(format!("failed to encode transfer records: {e}")))?;
    let mut staging = path.as_os_str().to_os_string();
    staging.push(".tmp");
    let staging = Path::new(&staging);
    fs::write(staging, payload)?;
    fs::rename(staging, path)?;
    Ok(())
}

/// Read the record set back, or `None` if the file does not exist.
///
/// Absence is not an error: a re-entrant open runs the post-hook with
/// nothing to migrate. A present-but-undecodable file is fatal.
pub(crate) fn read_records(path: &Path) -> Result<Option<Vec<TransferRecord>>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let records = serde_json::from_slice(&bytes).map_err(|e| {
        Error::Transform(format!(
            "transfer file {} is unreadable: {e}",
            path.display()
        ))
    })?;
    Ok(Some(records))
}

/// Delete the transfer file. Already-absent is fine.
pub(crate) fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
