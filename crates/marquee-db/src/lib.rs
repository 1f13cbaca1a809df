//! Marquee DB - Versioned persistent store for the movie library
//!
//! This crate provides the storage side of marquee:
//! - A schema version catalog with per-version stored models
//! - A migration engine run at store-open time, mixing lightweight
//!   structural stages with custom export/import stages
//! - Declarative fetch queries (filter + sort + eager relationship load)
//! - A narrow database facade returning immutable value snapshots
//!
//! Opening a store migrates it to the active schema before the handle is
//! returned; callers never observe a partially migrated store.

mod error;
mod facade;
pub mod migrations;
mod mock;
mod queries;
mod query;
pub mod schema;
mod store;

pub use error::{Error, Result};
pub use facade::MovieDb;
pub use migrations::{MigrationPlan, MigrationStage, TransferRecord};
pub use query::{ActorQuery, MovieQuery};
pub use schema::{SchemaVersion, ACTIVE, CATALOG};
pub use store::Store;
