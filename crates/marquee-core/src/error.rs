//! Error types for marquee-core

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid identifier: {0}")]
    InvalidId(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
