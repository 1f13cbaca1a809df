//! Error types for store operations
//!
//! Fatal categories (`Open`, `Transform`, `NotFound`) abort the operation
//! that raised them. Fetch paths recover from `Database` errors locally by
//! returning empty results; write paths surface them.

use thiserror::Error;

/// Errors that can occur while opening, migrating, or mutating a store.
#[derive(Debug, Error)]
pub enum Error {
    /// Catalog/stage misconfiguration or an unusable on-disk version.
    #[error("Failed to open store: {0}")]
    Open(String),

    /// Encode/decode failure during a custom migration stage.
    #[error("Migration transform failed: {0}")]
    Transform(String),

    /// Underlying storage engine error.
    #[error("Database error: {0}")]
    Database(#[from] native_db::db_type::Error),

    /// A snapshot identity failed to resolve within its own store.
    #[error("Identity did not resolve: {0}")]
    NotFound(String),

    /// A stored identifier failed to parse back into a domain id.
    #[error("Corrupt stored identifier: {0}")]
    Identity(#[from] marquee_core::Error),

    /// IO error on the migration side-channel.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;
