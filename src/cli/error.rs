//! CLI-specific error types.

use thiserror::Error;

use fashion_ingest::config::ConfigError;
use fashion_ingest::{DatabaseError, SourceError};

/// Errors surfaced at the binary boundary.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("invalid run date {0:?}: expected YYYYMMDD")]
    InvalidDate(String),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
}
